//! Structured file system errors for the build pipeline.
//!
//! Every read and write the pipeline performs goes through
//! [`FileResultExt::with_file_context`], so a failure carries the path it
//! happened on and the stage that asked for it instead of a bare
//! [`std::io::Error`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations performed during a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing an output artifact
    Write,
    /// Walking a level directory
    Walk,
    /// Creating the output directory
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Walk => write!(f, "walking"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

/// File operation error with the path and purpose attached
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            source,
        }
    }

    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' while {}",
            self.operation,
            self.file_path.display(),
            self.purpose
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe path does not exist.");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file/directory permissions for: {}",
                    self.file_path.display()
                ));
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str("\n\nThe file is not valid UTF-8 text.");
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }

    /// The path this error is about
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Extension trait for `io::Result` to attach file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| FileOperationError::new(operation, file_path, purpose, io_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_user_message_not_found() {
        let error = FileOperationError::new(
            FileOperation::Read,
            "blocks/button/button.js",
            "reading dependencies",
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let message = error.user_message();

        assert!(message.contains("Failed reading"));
        assert!(message.contains("blocks/button/button.js"));
        assert!(message.contains("reading dependencies"));
        assert!(message.contains("does not exist"));
    }

    #[test]
    fn test_file_result_ext() {
        let result: Result<(), std::io::Error> =
            Err(Error::new(ErrorKind::PermissionDenied, "access denied"));

        let error = result
            .with_file_context(FileOperation::Write, "/tmp/dist/index.css", "writing artifact")
            .unwrap_err();

        assert_eq!(error.operation, FileOperation::Write);
        assert_eq!(error.path(), Path::new("/tmp/dist/index.css"));
        assert!(error.user_message().contains("Permission denied"));
        assert!(error.to_string().contains("writing /tmp/dist/index.css"));
    }

    #[test]
    fn test_invalid_utf8_message() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("binary.css");
        std::fs::write(&path, [0xFF, 0xFE, 0xFD]).unwrap();

        let error = std::fs::read_to_string(&path)
            .with_file_context(FileOperation::Read, &path, "reading block file")
            .unwrap_err();

        assert_eq!(error.source.kind(), ErrorKind::InvalidData);
        assert!(error.user_message().contains("UTF-8"));
    }
}
