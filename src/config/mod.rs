//! Build configuration for bemaker
//!
//! A build is driven by one [`BuildConfig`]: where the levels are, which
//! blocks and extensions to build, how dependencies are declared and where
//! the artifacts go. It is assembled from a `bemaker.toml` project file
//! ([`ProjectFile`]) with CLI flags layered on top, or built directly in
//! code.
//!
//! # Project file (`bemaker.toml`)
//!
//! ```toml
//! outdir = "dist"
//! outname = "index"
//! levels = ["blocks/common", "blocks/desktop"]
//! extensions = [".css", ".js"]   # optional allow-list
//! blocks = ["page"]              # optional: build only these and what they require
//! deps_extension = ".js"
//! tag = "bemaker"
//!
//! [hooks]
//! before = "/* {relative} */\n"
//! after = "\n"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! # Hooks
//!
//! `before`/`after` wrap every concatenated file. A [`Hook`] is a constant
//! string, a template expanding `{path}`, `{relative}`, `{ext}`, `{index}`
//! (0-based) and `{total}`, or a Rust closure receiving a [`HookContext`].

mod parser;
mod project;

pub use parser::{parse_config, parse_config_str};
pub use project::{HooksSection, PROJECT_FILE, ProjectFile, find_project_file};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::annotations::DEFAULT_TAG;
use crate::core::BemakerError;

/// Default output base name
pub const DEFAULT_OUTNAME: &str = "index";

/// Default extension of files that carry dependency annotations
pub const DEFAULT_DEPS_EXTENSION: &str = ".js";

/// What a hook sees about the file it wraps
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Absolute path of the wrapped file
    pub path: &'a Path,
    /// Path relative to the build root
    pub relative: &'a Path,
    /// Extension of the group, with leading dot
    pub extension: &'a str,
    /// Position of the file in its group, 0-based
    pub index: usize,
    /// Number of files in the group
    pub total: usize,
}

/// Content spliced before or after each concatenated file
#[derive(Clone)]
pub enum Hook {
    /// Inserted verbatim
    Text(String),
    /// Placeholders `{path}`, `{relative}`, `{ext}`, `{index}`, `{total}` expanded
    Template(String),
    /// Computed per file
    Func(Arc<dyn Fn(&HookContext<'_>) -> String + Send + Sync>),
}

impl Hook {
    /// A hook computed by `f` for every file
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&HookContext<'_>) -> String + Send + Sync + 'static,
    {
        Hook::Func(Arc::new(f))
    }

    /// Produce the text for one file
    #[must_use]
    pub fn render(&self, ctx: &HookContext<'_>) -> String {
        match self {
            Hook::Text(text) => text.clone(),
            Hook::Template(template) => template
                .replace("{path}", &ctx.path.display().to_string())
                .replace("{relative}", &ctx.relative.display().to_string())
                .replace("{ext}", ctx.extension)
                .replace("{index}", &ctx.index.to_string())
                .replace("{total}", &ctx.total.to_string()),
            Hook::Func(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Hook::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Hook::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Everything one build needs
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory artifacts are written to; created if missing
    pub outdir: PathBuf,
    /// Artifact base name; `<outdir>/<outname><ext>`
    pub outname: String,
    /// Level directories, earliest first
    pub levels: Vec<PathBuf>,
    /// Only build these extensions
    pub extensions: Option<Vec<String>>,
    /// Only build these blocks plus their transitive requirements
    pub blocks: Option<Vec<String>>,
    /// Extension of files scanned for dependency annotations
    pub deps_extension: String,
    /// Annotation tag naming dependencies
    pub tag: String,
    /// Spliced before each file
    pub before: Option<Hook>,
    /// Spliced after each file
    pub after: Option<Hook>,
    /// Base for the relative paths handed to hooks
    pub root: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("."),
            outname: DEFAULT_OUTNAME.to_string(),
            levels: Vec::new(),
            extensions: None,
            blocks: None,
            deps_extension: DEFAULT_DEPS_EXTENSION.to_string(),
            tag: DEFAULT_TAG.to_string(),
            before: None,
            after: None,
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl BuildConfig {
    /// A configuration for `levels` with every other setting at its default
    pub fn new<I, P>(levels: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the output directory and base name
    #[must_use]
    pub fn with_output(mut self, outdir: impl Into<PathBuf>, outname: impl Into<String>) -> Self {
        self.outdir = outdir.into();
        self.outname = outname.into();
        self
    }

    /// Restrict the build to these extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions =
            Some(extensions.into_iter().map(|ext| normalize_extension(ext.as_ref())).collect());
        self
    }

    /// Restrict the build to these blocks and their requirements
    #[must_use]
    pub fn with_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks = Some(blocks.into_iter().map(Into::into).collect());
        self
    }

    /// Scan files with `extension` for annotations
    #[must_use]
    pub fn with_deps_extension(mut self, extension: &str) -> Self {
        self.deps_extension = normalize_extension(extension);
        self
    }

    /// Use `tag` instead of `bemaker` for annotations
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Wrap every file with `before` and `after`
    #[must_use]
    pub fn with_hooks(mut self, before: Option<Hook>, after: Option<Hook>) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Resolve hook-relative paths against `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Output path for one extension group
    #[must_use]
    pub fn artifact_path(&self, extension: &str) -> PathBuf {
        self.outdir.join(format!("{}{}", self.outname, extension))
    }

    /// Whether files with `extension` take part in the build
    #[must_use]
    pub fn builds_extension(&self, extension: &str) -> bool {
        match &self.extensions {
            Some(allowed) => allowed.iter().any(|ext| ext == extension),
            None => true,
        }
    }

    /// Reject configurations that cannot produce a build
    pub fn validate(&self) -> Result<(), BemakerError> {
        if self.levels.is_empty() {
            return Err(BemakerError::InvalidConfig {
                reason: "no level directories configured".to_string(),
            });
        }
        if self.outname.is_empty() || self.outname.contains(['/', '\\']) {
            return Err(BemakerError::InvalidConfig {
                reason: format!("output name '{}' must be a plain file name", self.outname),
            });
        }
        if self.tag.trim_start_matches('@').is_empty() {
            return Err(BemakerError::InvalidConfig {
                reason: "annotation tag must not be empty".to_string(),
            });
        }
        if let Some(level) = self.levels.iter().find(|level| !level.is_dir()) {
            return Err(BemakerError::LevelNotFound {
                path: level.display().to_string(),
            });
        }
        Ok(())
    }
}

/// `css` → `.css`; `.css` stays as is
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    let extension = extension.trim();
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}
