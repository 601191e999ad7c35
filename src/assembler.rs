//! Content assembly for build artifacts.
//!
//! An artifact is an ordered list of [`Part`]s: literal strings and
//! references to files. File parts are read through a [`FileCache`] (text
//! read during discovery is not read again) and may be wrapped with the
//! configured before/after [`Hook`]s.
//!
//! The cache belongs to a single build. Nothing invalidates it: a file
//! changed on disk mid-build keeps the content first read.

use dashmap::DashMap;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

use crate::config::{Hook, HookContext};
use crate::core::{FileOperation, FileOperationError, FileResultExt};

/// File text memoized for the duration of one build
#[derive(Debug, Default)]
pub struct FileCache {
    entries: DashMap<PathBuf, Arc<str>>,
}

impl FileCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of `path`, read from disk on first access
    pub async fn read(&self, path: &Path) -> Result<Arc<str>, FileOperationError> {
        if let Some(content) = self.entries.get(path) {
            trace!("Cache hit for {}", path.display());
            return Ok(Arc::clone(content.value()));
        }

        let content: Arc<str> = tokio::fs::read_to_string(path)
            .await
            .with_file_context(FileOperation::Read, path, "reading block file")?
            .into();
        self.entries.insert(path.to_path_buf(), Arc::clone(&content));
        Ok(content)
    }

    /// Number of cached files
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was read yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` has been read
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

/// One piece of an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Inserted verbatim, never wrapped
    Literal(String),
    /// Contents of a file, wrapped with the hooks
    File(PathBuf),
}

/// Hooks and the context they render against
#[derive(Debug, Clone, Copy)]
pub struct Wrapping<'a> {
    /// Spliced before each file part
    pub before: Option<&'a Hook>,
    /// Spliced after each file part
    pub after: Option<&'a Hook>,
    /// Base for [`HookContext::relative`]
    pub root: &'a Path,
    /// Extension handed to the hooks
    pub extension: &'a str,
}

impl<'a> Wrapping<'a> {
    /// No hooks
    #[must_use]
    pub const fn none(root: &'a Path, extension: &'a str) -> Self {
        Self {
            before: None,
            after: None,
            root,
            extension,
        }
    }
}

/// Concatenate `parts` in order
///
/// File parts are read concurrently and spliced back in their original
/// position. `index` and `total` in the hook context count file parts only.
pub async fn assemble(
    parts: &[Part],
    wrapping: Wrapping<'_>,
    cache: &FileCache,
) -> Result<String, FileOperationError> {
    let reads = parts.iter().map(|part| async move {
        match part {
            Part::Literal(_) => Ok(None),
            Part::File(path) => cache.read(path).await.map(Some),
        }
    });
    let contents: Vec<Option<Arc<str>>> =
        join_all(reads).await.into_iter().collect::<Result<_, _>>()?;

    let total = parts.iter().filter(|part| matches!(part, Part::File(_))).count();
    let mut output = String::new();
    let mut index = 0;

    for (part, content) in parts.iter().zip(contents) {
        match (part, content) {
            (Part::Literal(text), _) => output.push_str(text),
            (Part::File(path), Some(content)) => {
                let relative = path.strip_prefix(wrapping.root).unwrap_or(path);
                let ctx = HookContext {
                    path,
                    relative,
                    extension: wrapping.extension,
                    index,
                    total,
                };
                if let Some(before) = wrapping.before {
                    output.push_str(&before.render(&ctx));
                }
                output.push_str(&content);
                if let Some(after) = wrapping.after {
                    output.push_str(&after.render(&ctx));
                }
                index += 1;
            }
            (Part::File(_), None) => {}
        }
    }

    Ok(output)
}
