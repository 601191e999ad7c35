//! TOML parsing with file path context.
//!
//! A read failure surfaces as a [`FileOperationError`] naming the path; a
//! syntax or schema failure surfaces as [`BemakerError::ConfigParseError`]
//! carrying the file and the parser message.
//!
//! [`FileOperationError`]: crate::core::FileOperationError

use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::{BemakerError, FileOperation, FileResultExt};

/// Read `path` and deserialize it as TOML
pub fn parse_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "loading the project file",
    )?;

    parse_config_str(&content, path)
}

/// Deserialize TOML `content` that was read from `path`
pub fn parse_config_str<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    toml::from_str(content).map_err(|error| {
        BemakerError::ConfigParseError {
            file: path.display().to_string(),
            reason: error.message().to_string(),
        }
        .into()
    })
}
