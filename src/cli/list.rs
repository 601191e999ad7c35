//! `bemaker list`: show blocks in build order.
//!
//! Runs discovery, selection and ordering without writing anything. Text
//! output shows each block with its requirements and the levels it was
//! found in; JSON output adds the cycles and missing dependencies found on
//! the way.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use super::CliConfig;
use super::build::display_path;
use super::common::{BuildOptions, command_sink};
use crate::assembler::FileCache;
use crate::blocks::{Block, Builder};
use crate::events::CollectingSink;
use crate::pool::Pool;

/// Output format for `bemaker list`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Machine-readable JSON document
    Json,
}

/// List blocks in the order they would be built
#[derive(Args, Debug, Clone, Default)]
pub struct ListCommand {
    #[command(flatten)]
    options: BuildOptions,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = ListFormat::Text)]
    format: ListFormat,
}

impl ListCommand {
    /// Run against the current working directory
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let cwd = std::env::current_dir()?;
        self.execute_in(&cwd, cli).await
    }

    /// Run with `cwd` as the working directory
    pub async fn execute_in(self, cwd: &Path, cli: &CliConfig) -> Result<()> {
        let config = self.options.resolve(cli.config_path.as_deref(), cwd)?;
        let collector = Arc::new(CollectingSink::new());
        let show_progress = cli.show_progress() && self.format == ListFormat::Text;
        let (spinner, sink) = command_sink(show_progress, Some(collector.clone()));
        let builder = Builder::new(config).with_sink(sink);

        let cache = FileCache::new();
        let discovered = builder.discover(&cache).await;
        spinner.finish_and_clear();
        let blocks = builder.order(&builder.select(discovered?));

        match self.format {
            ListFormat::Json => println!("{}", render_json(&blocks, &collector)?),
            ListFormat::Text if !cli.quiet => print!("{}", render_text(&blocks, cwd)),
            ListFormat::Text => {}
        }
        Ok(())
    }
}

fn render_json(blocks: &Pool<Block>, collector: &CollectingSink) -> Result<String> {
    let missing: Vec<_> = collector
        .missing()
        .into_iter()
        .map(|(consumer, name)| {
            json!({
                "consumer": consumer,
                "name": name,
            })
        })
        .collect();
    let document = json!({
        "blocks": blocks.all(),
        "cycles": collector.cycles(),
        "missing": missing,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

fn render_text(blocks: &Pool<Block>, cwd: &Path) -> String {
    if blocks.is_empty() {
        return format!("{}\n", "No blocks found".yellow());
    }

    let mut output = String::new();
    for (position, block) in blocks.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", position + 1, block.name.bold()));
        if !block.requires.is_empty() {
            output.push_str(&format!("     requires: {}\n", block.requires.join(", ")));
        }
        for level in &block.levels {
            output.push_str(&format!(
                "     {} ({} file(s))\n",
                display_path(&level.path, cwd).dimmed(),
                level.files.len()
            ));
        }
    }
    output
}
