//! `bemaker build`: run the pipeline and write the artifacts.
//!
//! ```bash
//! # Use ./bemaker.toml
//! bemaker build
//!
//! # No project file: levels and output on the command line
//! bemaker build -l blocks/common -l blocks/desktop -o dist
//!
//! # Only CSS for the page block and its requirements
//! bemaker build --block page --ext css
//!
//! # Show what would be concatenated without writing
//! bemaker build --dry-run
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::CliConfig;
use super::common::{BuildOptions, command_sink};
use crate::assembler::FileCache;
use crate::blocks::{Builder, ExtensionGroup};

/// Build artifacts from the configured levels
#[derive(Args, Debug, Clone, Default)]
pub struct BuildCommand {
    #[command(flatten)]
    options: BuildOptions,

    /// Print the extension groups instead of writing artifacts
    #[arg(long)]
    dry_run: bool,
}

impl BuildCommand {
    /// Run against the current working directory
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let cwd = std::env::current_dir()?;
        self.execute_in(&cwd, cli).await
    }

    /// Run with `cwd` as the working directory
    pub async fn execute_in(self, cwd: &Path, cli: &CliConfig) -> Result<()> {
        let config = self.options.resolve(cli.config_path.as_deref(), cwd)?;
        let (spinner, sink) = command_sink(cli.show_progress(), None);
        let builder = Builder::new(config).with_sink(sink);

        if self.dry_run {
            let cache = FileCache::new();
            let discovered = builder.discover(&cache).await;
            let groups = discovered.map(|blocks| {
                let blocks = builder.order(&builder.select(blocks));
                builder.group(&blocks)
            });
            spinner.finish_and_clear();
            print_groups(&groups?, builder.config().artifact_path(""), cwd, cli.quiet);
            return Ok(());
        }

        let result = builder.build().await;
        spinner.finish_and_clear();
        let report = result?;

        if !cli.quiet {
            for artifact in &report.artifacts {
                println!("{} {}", "✓".green(), display_path(&artifact.path, cwd));
            }
            println!(
                "{} {} artifact(s) from {} block(s)",
                "Built".green().bold(),
                report.artifacts.len(),
                report.blocks.len()
            );
        }
        Ok(())
    }
}

fn print_groups(groups: &[ExtensionGroup], base: PathBuf, cwd: &Path, quiet: bool) {
    if quiet {
        return;
    }
    if groups.is_empty() {
        println!("{}", "Nothing to build".yellow());
        return;
    }
    for group in groups {
        let target = format!("{}{}", display_path(&base, cwd), group.extension);
        println!("{} ({} file(s))", target.bold(), group.files.len());
        for file in &group.files {
            println!("  {}", display_path(file, cwd));
        }
    }
}

/// `path` relative to `cwd` when it lies below it
pub(super) fn display_path(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd).unwrap_or(path).display().to_string()
}
