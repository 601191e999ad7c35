//! Integration test suite for bemaker
//!
//! Drives the compiled binary against project trees in temporary
//! directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **build**: artifacts, ordering across levels, allow-lists, hooks, dry runs
//! - **diagnostics**: cycles and missing dependencies do not stop a build
//! - **errors**: user-facing failures and exit codes
//! - **list**: text and JSON listings

#[path = "../common/mod.rs"]
mod common;

mod build;
mod diagnostics;
mod errors;
mod list;
