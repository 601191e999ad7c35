//! Options and setup shared by the build commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{BuildConfig, Hook, ProjectFile, find_project_file, normalize_extension};
use crate::core::BemakerError;
use crate::events::{EventSink, TracingSink};
use crate::utils::progress::{ProgressSink, Spinner};

/// Build settings that override `bemaker.toml`
#[derive(Args, Debug, Clone, Default)]
pub struct BuildOptions {
    /// Level directory; repeat in override order. Replaces the project file's levels
    #[arg(short = 'l', long = "level", value_name = "DIR")]
    pub levels: Vec<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Output base name; artifacts are written as <outname><ext>
    #[arg(short = 'n', long, value_name = "NAME")]
    pub outname: Option<String>,

    /// Only build this extension; repeatable
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only build this block and what it requires; repeatable
    #[arg(short = 'b', long = "block", value_name = "NAME")]
    pub blocks: Vec<String>,

    /// Extension of files scanned for dependency annotations
    #[arg(long = "deps-ext", value_name = "EXT")]
    pub deps_extension: Option<String>,

    /// Annotation tag naming dependencies
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Template inserted before each file ({path} {relative} {ext} {index} {total})
    #[arg(long, value_name = "TEMPLATE")]
    pub before: Option<String>,

    /// Template inserted after each file
    #[arg(long, value_name = "TEMPLATE")]
    pub after: Option<String>,
}

impl BuildOptions {
    /// Merge the project file (explicit or found in `cwd`) with these flags
    ///
    /// Relative flag paths resolve against `cwd`; relative file paths
    /// against the file's directory. Hook paths are always relative to `cwd`.
    pub fn resolve(&self, config_path: Option<&Path>, cwd: &Path) -> Result<BuildConfig> {
        let project_path = match config_path {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(BemakerError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Some(path)
            }
            None => find_project_file(cwd),
        };

        let mut config = match project_path {
            Some(path) => {
                let base_dir = path.parent().unwrap_or(cwd).to_path_buf();
                ProjectFile::load(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
                    .into_config(&base_dir)
            }
            None => BuildConfig::default().with_output(cwd, crate::config::DEFAULT_OUTNAME),
        };
        config.root = cwd.to_path_buf();

        if !self.levels.is_empty() {
            config.levels = self.levels.iter().map(|level| cwd.join(level)).collect();
        }
        if let Some(outdir) = &self.outdir {
            config.outdir = cwd.join(outdir);
        }
        if let Some(outname) = &self.outname {
            config.outname.clone_from(outname);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(&self.extensions);
        }
        if !self.blocks.is_empty() {
            config.blocks = Some(self.blocks.clone());
        }
        if let Some(extension) = &self.deps_extension {
            config.deps_extension = normalize_extension(extension);
        }
        if let Some(tag) = &self.tag {
            config.tag.clone_from(tag);
        }
        if let Some(before) = &self.before {
            config.before = Some(Hook::Template(before.clone()));
        }
        if let Some(after) = &self.after {
            config.after = Some(Hook::Template(after.clone()));
        }

        config.validate()?;
        Ok(config)
    }
}

/// Event sink used by the commands: log lines plus a spinner
pub fn command_sink(show_progress: bool, extra: Option<Arc<dyn EventSink>>) -> (Spinner, Arc<dyn EventSink>) {
    let spinner = Spinner::new(show_progress);
    let inner: Arc<dyn EventSink> = match extra {
        Some(extra) => Arc::new(move |event: &crate::events::BuildEvent| {
            TracingSink.emit(event);
            extra.emit(event);
        }),
        None => Arc::new(TracingSink),
    };
    (spinner.clone(), Arc::new(ProgressSink::new(spinner, inner)))
}
