//! Blocks and the build pipeline that assembles them.
//!
//! A block is a directory directly under a level root. The same block name
//! may appear in several levels; its file lists are merged, never
//! overridden, so later levels only add to what earlier levels provide.
//!
//! [`Builder`] drives the stages:
//!
//! 1. [`Builder::discover`] walks the levels and merges blocks
//! 2. [`Builder::select`] keeps requested blocks and what they require
//! 3. [`Builder::order`] sorts requirements before dependents
//! 4. [`Builder::group`] collects file paths per extension
//! 5. [`Builder::write`] concatenates each group into `<outdir>/<outname><ext>`
//!
//! [`Builder::build`] chains all five.

mod builder;
mod discover;

pub use builder::{Artifact, BuildReport, Builder, ExtensionGroup};

use serde::Serialize;
use std::path::PathBuf;

use crate::graph::Node;
use crate::pool::Named;
use crate::selector::Selector;

/// A file belonging to a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFile {
    /// File name
    pub basename: String,
    /// Last `.suffix` of the name, with the dot; `None` when there is no dot
    pub extension: Option<String>,
    /// Absolute path
    pub path: PathBuf,
    /// BEM identity derived from the name
    pub selector: Selector,
}

impl BlockFile {
    /// Describe the file at `path` named `basename`, owned by `block`
    #[must_use]
    pub fn new(block: &str, basename: impl Into<String>, path: PathBuf) -> Self {
        let basename = basename.into();
        Self {
            extension: extension_of(&basename),
            selector: Selector::resolve(&basename, Some(block)),
            basename,
            path,
        }
    }
}

/// A block's files inside one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockLevel {
    /// The level root
    pub path: PathBuf,
    /// Files in discovery order
    pub files: Vec<BlockFile>,
}

/// A named unit merged across levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Directory name under the level root
    pub name: String,
    /// Required block names, first-seen order, no duplicates
    pub requires: Vec<String>,
    /// One entry per level that has this block, in configured order
    pub levels: Vec<BlockLevel>,
}

impl Block {
    /// A block with no files yet
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Record a requirement unless it is already known
    ///
    /// Returns `false` for duplicates.
    pub fn add_requirement(&mut self, name: &str) -> bool {
        if self.requires.iter().any(|existing| existing == name) {
            return false;
        }
        self.requires.push(name.to_string());
        true
    }

    /// Every file across all levels, level order then discovery order
    pub fn files(&self) -> impl Iterator<Item = &BlockFile> {
        self.levels.iter().flat_map(|level| level.files.iter())
    }
}

impl Named for Block {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Node for Block {
    fn requires(&self) -> &[String] {
        &self.requires
    }
}

/// `button.deps.js` → `.js`; `Makefile` and `.gitkeep` → `None`
///
/// A leading dot marks a hidden file, not an extension.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rfind('.')
        .filter(|&dot| dot > 0)
        .map(|dot| file_name[dot..].to_string())
        .filter(|ext| ext.len() > 1)
}
