//! Core error types for bemaker
//!
//! - [`error`] - [`BemakerError`], [`ErrorContext`] and [`user_friendly_error`]
//!   for turning any failure into a colored CLI report
//! - [`file_error`] - [`FileOperationError`] and [`FileResultExt`] so every
//!   I/O failure names the path and stage it came from

pub mod error;
pub mod file_error;

pub use error::{BemakerError, ErrorContext, create_error_context, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
