//! Command-line interface for bemaker.
//!
//! # Commands
//!
//! - `build` - discover blocks, order them and write one artifact per extension
//! - `list` - show blocks in build order with their requirements
//!
//! Both commands read `bemaker.toml` from the working directory (or the
//! file given with `--config`) and accept the same override flags.
//!
//! ```bash
//! bemaker build
//! bemaker build -l blocks/common -l blocks/desktop --outdir dist
//! bemaker list --format json
//! bemaker -v build --block page
//! ```
//!
//! # Global Options
//!
//! - `-v, --verbose` - debug logging
//! - `-q, --quiet` - errors only, no summary output
//! - `-c, --config <FILE>` - explicit project file
//! - `--no-progress` - no spinner (also `BEMAKER_NO_PROGRESS`)

mod build;
mod common;
mod list;

pub use build::BuildCommand;
pub use common::BuildOptions;
pub use list::{ListCommand, ListFormat};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence
    pub log_level: String,
    /// Suppress normal output
    pub quiet: bool,
    /// Disable the spinner
    pub no_progress: bool,
    /// Explicit project file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Whether the spinner may be shown
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Install the global `tracing` subscriber, writing to stderr
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Build tool for BEM blocks spread across override levels
#[derive(Parser, Debug)]
#[command(
    name = "bemaker",
    version,
    about = "Build tool for BEM blocks spread across override levels",
    long_about = "bemaker merges blocks across level directories, orders them by the \
                  dependencies declared in their annotations and concatenates their files \
                  into one artifact per extension."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the project file (default: ./bemaker.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable the progress spinner
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build artifacts
    Build(BuildCommand),

    /// List blocks in build order
    List(ListCommand),
}

impl Cli {
    /// Install logging and run the selected command
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`]
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "bemaker=info,warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            quiet: self.quiet,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit configuration
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Build(cmd) => cmd.execute(&config).await,
            Commands::List(cmd) => cmd.execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::parse_from(["bemaker", "-v", "build"]);
        assert_eq!(cli.build_config().log_level, "debug");

        let cli = Cli::parse_from(["bemaker", "build", "--quiet", "--no-progress"]);
        let config = cli.build_config();
        assert_eq!(config.log_level, "error");
        assert!(config.quiet);
        assert!(!config.show_progress());

        let cli = Cli::parse_from(["bemaker", "list", "-c", "site.toml"]);
        let config = cli.build_config();
        assert_eq!(config.log_level, "bemaker=info,warn");
        assert_eq!(config.config_path, Some(PathBuf::from("site.toml")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["bemaker", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn test_build_flags_parse() {
        let cli = Cli::parse_from([
            "bemaker", "build", "-l", "common", "--level", "desktop", "--ext", "css", "--block", "page",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Build(cmd) => {
                let rendered = format!("{cmd:?}");
                assert!(rendered.contains("dry_run: true"));
                assert!(rendered.contains("\"desktop\""));
            }
            Commands::List(_) => panic!("expected build"),
        }
    }

    #[test]
    fn test_list_format_parse() {
        let cli = Cli::parse_from(["bemaker", "list", "--format", "json"]);
        assert!(matches!(cli.command, Commands::List(_)));
        assert!(Cli::try_parse_from(["bemaker", "list", "--format", "yaml"]).is_err());
    }
}
