//! User interface helpers
//!
//! - [`progress`] - spinner shown while a build runs

pub mod progress;

pub use progress::{ProgressSink, Spinner};
