//! bemaker - a build tool for BEM blocks spread across override levels
//!
//! A project keeps its front-end components ("blocks") in level directories.
//! Later levels extend earlier ones: a block found in several levels keeps
//! the files of every level. Blocks declare what they need with annotations
//! in doc comments, and bemaker concatenates their files so requirements
//! come first, one artifact per extension.
//!
//! # Architecture
//!
//! - [`pool`] - ordered registry of uniquely named records
//! - [`graph`] - cycle-tolerant ordering and requirement closure with diagnostics
//! - [`blocks`] - discovery, selection, ordering, grouping and writing
//! - [`walker`], [`annotations`], [`selector`], [`assembler`] - file listing,
//!   dependency annotations, BEM names and concatenation
//! - [`events`] - what the pipeline reports while it runs
//! - [`config`] - build settings and the `bemaker.toml` project file
//! - [`core`] - error types and user-facing error reporting
//! - [`cli`] - the `bemaker` command
//!
//! # Example
//!
//! ```rust,no_run
//! use bemaker::blocks::Builder;
//! use bemaker::config::BuildConfig;
//! use bemaker::events::TracingSink;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BuildConfig::new(["blocks/common", "blocks/desktop"])
//!     .with_output("dist", "index")
//!     .with_extensions([".css", ".js"]);
//!
//! let report = Builder::new(config).with_sink(Arc::new(TracingSink)).build().await?;
//! println!("{:?}", report.content(".css"));
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod assembler;
pub mod blocks;
pub mod cli;
pub mod config;
pub mod core;
pub mod events;
pub mod graph;
pub mod pool;
pub mod selector;
pub mod utils;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
