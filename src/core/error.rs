//! Error handling for bemaker
//!
//! Two layers, the same way every command reports failures:
//! 1. [`BemakerError`] - strongly-typed failures raised by the library
//! 2. [`ErrorContext`] - a wrapper that adds details and an actionable
//!    suggestion for the CLI
//!
//! Cycles and dangling requirements are deliberately absent from this enum:
//! they are diagnostics (see [`crate::graph::Diagnostic`]) and never abort a
//! build. The only registry failure is a duplicate or empty name, raised as
//! [`crate::pool::PoolError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bemaker::core::{BemakerError, user_friendly_error};
//!
//! let error = anyhow::Error::from(BemakerError::ConfigNotFound {
//!     path: "bemaker.toml".to_string(),
//! });
//! let ctx = user_friendly_error(error);
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::file_error::{FileOperation, FileOperationError};
use crate::pool::PoolError;

/// The main error type for bemaker operations
#[derive(Error, Debug, Clone)]
pub enum BemakerError {
    /// The project file passed with `--config` does not exist
    #[error("Project file not found: {path}")]
    ConfigNotFound {
        /// The path that was given
        path: String,
    },

    /// The project file exists but is not valid TOML for [`crate::config::ProjectFile`]
    #[error("Invalid project file {file}: {reason}")]
    ConfigParseError {
        /// Path of the file that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// The merged configuration cannot drive a build
    #[error("Invalid build configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it
        reason: String,
    },

    /// A configured level directory does not exist
    #[error("Level directory not found: {path}")]
    LevelNotFound {
        /// The missing level path
        path: String,
    },

    /// Two blocks with the same name ended up in one registry
    #[error("Duplicate block name: {name}")]
    DuplicateBlock {
        /// The offending name
        name: String,
    },

    /// A file could not be read, walked or written
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed
        operation: String,
        /// The affected path
        path: String,
    },

    /// Some extension groups were written, others failed
    #[error("Build finished with {} failed artifact(s)", failed.len())]
    PartialBuild {
        /// Each failed artifact path with the reason it failed
        failed: Vec<(PathBuf, String)>,
    },

    /// Anything without a dedicated variant
    #[error("{message}")]
    Other {
        /// The message to show
        message: String,
    },
}

/// Error wrapper carrying user-facing details and a suggestion
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BemakerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details
    #[must_use]
    pub const fn new(error: BemakerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the CLI
///
/// Recognizes, in order: [`BemakerError`], [`PoolError`], [`FileOperationError`],
/// [`toml::de::Error`] and [`std::io::Error`] anywhere in the error chain.
/// Everything else is shown with its full context chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(bemaker_error) = cause.downcast_ref::<BemakerError>() {
            return create_error_context(bemaker_error);
        }

        if let Some(pool_error) = cause.downcast_ref::<PoolError>() {
            let name = match pool_error {
                PoolError::DuplicateKey {
                    name,
                } => name.clone(),
                other => {
                    return ErrorContext::new(BemakerError::Other {
                        message: other.to_string(),
                    });
                }
            };
            return create_error_context(&BemakerError::DuplicateBlock {
                name,
            });
        }

        if let Some(file_error) = cause.downcast_ref::<FileOperationError>() {
            let ctx = ErrorContext::new(BemakerError::FileSystemError {
                operation: file_error.operation.to_string(),
                path: file_error.file_path.display().to_string(),
            })
            .with_details(file_error.user_message());
            return match file_error.operation {
                FileOperation::Write | FileOperation::CreateDir => ctx.with_suggestion(
                    "Check that the output directory is writable or choose another with --outdir",
                ),
                FileOperation::Read | FileOperation::Walk => ctx.with_suggestion(
                    "Check that the level directories exist and contain readable UTF-8 files",
                ),
            };
        }

        if let Some(toml_error) = cause.downcast_ref::<toml::de::Error>() {
            return ErrorContext::new(BemakerError::ConfigParseError {
                file: "bemaker.toml".to_string(),
                reason: toml_error.message().to_string(),
            })
            .with_suggestion("Check the TOML syntax in bemaker.toml")
            .with_details(toml_error.to_string());
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>()
            && io_error.kind() == std::io::ErrorKind::PermissionDenied
        {
            return ErrorContext::new(BemakerError::FileSystemError {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check file ownership and permissions");
        }
    }

    ErrorContext::new(BemakerError::Other {
        message: format!("{error:#}"),
    })
}

/// Attach the canned details and suggestion for a known error
pub fn create_error_context(error: &BemakerError) -> ErrorContext {
    let ctx = ErrorContext::new(error.clone());
    match error {
        BemakerError::ConfigNotFound {
            ..
        } => ctx
            .with_suggestion("Check the --config path, or omit it to use ./bemaker.toml")
            .with_details("Without --config, bemaker reads bemaker.toml from the current directory if present"),
        BemakerError::ConfigParseError {
            ..
        } => ctx.with_suggestion("Check the TOML syntax and field names in the project file"),
        BemakerError::InvalidConfig {
            ..
        } => ctx.with_suggestion("Run 'bemaker build --help' to see the available options"),
        BemakerError::LevelNotFound {
            path,
        } => ctx
            .with_suggestion(format!("Create '{path}' or remove it from the level list"))
            .with_details("Levels are resolved relative to the project file's directory"),
        BemakerError::DuplicateBlock {
            name,
        } => ctx
            .with_details(format!("The name '{name}' was registered twice in one block registry"))
            .with_suggestion("Block names must be unique within a build stage"),
        BemakerError::FileSystemError {
            ..
        } => ctx.with_suggestion("Check that the path exists and is accessible"),
        BemakerError::PartialBuild {
            failed,
        } => {
            let details = failed
                .iter()
                .map(|(path, reason)| format!("{}: {reason}", path.display()))
                .collect::<Vec<_>>()
                .join("\n");
            ctx.with_details(details)
                .with_suggestion("Fix the failing artifacts and run the build again")
        }
        BemakerError::Other {
            ..
        } => ctx,
    }
}
