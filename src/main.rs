//! bemaker CLI entry point
//!
//! Parses arguments, runs the command and turns failures into a colored
//! message with details and a suggestion.

use anyhow::Result;
use bemaker::cli;
use bemaker::core::error::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
