//! The `bemaker.toml` project file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{BuildConfig, Hook, normalize_extension, parse_config};

/// File name looked up in the working directory
pub const PROJECT_FILE: &str = "bemaker.toml";

/// `[hooks]` table; both values are templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HooksSection {
    /// Spliced before each file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Spliced after each file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Raw contents of `bemaker.toml`
///
/// Every field is optional; unset fields fall back to [`BuildConfig`]
/// defaults when converted with [`ProjectFile::into_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<PathBuf>,
    /// Output base name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outname: Option<String>,
    /// Level directories in override order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<PathBuf>,
    /// Extension allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// Block allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<String>>,
    /// Extension of dependency-bearing files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps_extension: Option<String>,
    /// Annotation tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Per-file wrappers
    #[serde(default)]
    pub hooks: HooksSection,
}

impl ProjectFile {
    /// Load and parse a project file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading project file {}", path.display());
        parse_config(path)
    }

    /// Turn the file into a [`BuildConfig`], resolving relative paths against `base_dir`
    ///
    /// The hook root is left at its default; callers set it to the working directory.
    #[must_use]
    pub fn into_config(self, base_dir: &Path) -> BuildConfig {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        let mut config = BuildConfig::new(self.levels.into_iter().map(resolve));
        config.outdir = resolve(self.outdir.unwrap_or_else(|| PathBuf::from(".")));
        if let Some(outname) = self.outname {
            config.outname = outname;
        }
        if let Some(extensions) = self.extensions {
            config = config.with_extensions(extensions);
        }
        config.blocks = self.blocks;
        if let Some(extension) = self.deps_extension {
            config.deps_extension = normalize_extension(&extension);
        }
        if let Some(tag) = self.tag {
            config.tag = tag;
        }
        config.before = self.hooks.before.map(Hook::Template);
        config.after = self.hooks.after.map(Hook::Template);
        config
    }
}

/// `bemaker.toml` inside `dir`, if present
#[must_use]
pub fn find_project_file(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(PROJECT_FILE);
    candidate.is_file().then_some(candidate)
}
