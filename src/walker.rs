//! Recursive file listing for level directories.
//!
//! Uses `walkdir` without following symlinks. Entries are sorted by file
//! name inside each directory so the same tree always produces the same
//! order, whatever the filesystem reports.

use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

use crate::core::file_error::{FileOperation, FileOperationError};

/// One file found under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute (or root-joined) path of the file
    pub path: PathBuf,
    /// File name without directories
    pub file_name: String,
    /// Path relative to the walked root
    pub relative: PathBuf,
}

/// List every file below `root`, depth-first, in stable order
///
/// Directories themselves are not returned. A missing or unreadable root is
/// an error; unreadable entries below it are too, so a build never silently
/// skips part of a level.
pub fn walk(root: &Path) -> Result<Vec<WalkedFile>, FileOperationError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|error| {
            let path = error.path().unwrap_or(root).to_path_buf();
            let source = error.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("filesystem loop while walking directory")
            });
            FileOperationError::new(FileOperation::Walk, path, "listing level files", source)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        trace!("Walked {}", relative.display());
        files.push(WalkedFile {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            relative,
            path,
        });
    }

    Ok(files)
}
