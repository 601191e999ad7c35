//! The staged build pipeline.

use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::Block;
use super::discover::{merge, scan_level};
use crate::annotations::AnnotationExtractor;
use crate::assembler::{FileCache, Part, Wrapping, assemble};
use crate::config::BuildConfig;
use crate::core::{BemakerError, FileOperation, FileResultExt};
use crate::events::{BuildEvent, EventSink, NullSink};
use crate::graph::{DependencyGraph, Diagnostic, Resolution};
use crate::pool::Pool;

/// Files sharing one extension, in build order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionGroup {
    /// Extension with leading dot
    pub extension: String,
    /// Absolute paths in concatenation order
    pub files: Vec<PathBuf>,
}

/// One written output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Extension the artifact was built for
    pub extension: String,
    /// Where it was written
    pub path: PathBuf,
    /// What was written
    pub content: String,
}

/// Result of a full build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Blocks in build order
    pub blocks: Pool<Block>,
    /// Artifacts in group order
    pub artifacts: Vec<Artifact>,
}

impl BuildReport {
    /// Content built for `extension`
    #[must_use]
    pub fn content(&self, extension: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.extension == extension)
            .map(|artifact| artifact.content.as_str())
    }
}

/// Runs the pipeline for one [`BuildConfig`]
///
/// Each stage can be called on its own; [`Builder::build`] chains them with
/// a fresh [`FileCache`]. A cycle path or a missing block name is reported
/// once per build even when both selection and ordering run into it.
pub struct Builder {
    config: BuildConfig,
    sink: Arc<dyn EventSink>,
    reported: Mutex<Reported>,
}

/// Diagnostics already sent to the sink
#[derive(Debug, Default)]
struct Reported {
    cycles: HashSet<Vec<String>>,
    missing: HashSet<String>,
}

impl Reported {
    /// Whether `diagnostic` has not been seen yet; records it
    fn first_time(&mut self, diagnostic: &Diagnostic) -> bool {
        match diagnostic {
            Diagnostic::Cycle {
                path,
            } => self.cycles.insert(path.clone()),
            Diagnostic::Missing {
                name,
                ..
            } => self.missing.insert(name.clone()),
        }
    }
}

impl Builder {
    /// A builder that discards events
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NullSink),
            reported: Mutex::new(Reported::default()),
        }
    }

    /// Send events to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration this builder runs
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Walk every level and merge same-named blocks
    pub async fn discover(&self, cache: &FileCache) -> Result<Pool<Block>> {
        let extractor = AnnotationExtractor::new(&self.config.tag).map_err(|error| {
            BemakerError::InvalidConfig {
                reason: format!("annotation tag '{}' is not usable: {error}", self.config.tag),
            }
        })?;

        let scans = join_all(self.config.levels.iter().map(|level| {
            scan_level(level, &self.config.deps_extension, &extractor, cache)
        }))
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let pool = merge(scans, self.sink.as_ref())?;
        debug!("Discovered {} block(s) in {} level(s)", pool.len(), self.config.levels.len());
        Ok(pool)
    }

    /// Keep configured blocks and their transitive requirements
    ///
    /// Without a block list the pool is returned unchanged.
    pub fn select(&self, blocks: Pool<Block>) -> Pool<Block> {
        let Some(wanted) = &self.config.blocks else {
            return blocks;
        };

        let resolution = DependencyGraph::new(&blocks).filter(wanted.iter().map(String::as_str));
        debug!("Selected {} of {} block(s)", resolution.pool.len(), blocks.len());
        self.report(resolution)
    }

    /// Put requirements before the blocks that need them
    ///
    /// Requirements naming a block outside `blocks` do not affect the order
    /// and are reported as missing.
    pub fn order(&self, blocks: &Pool<Block>) -> Pool<Block> {
        let mut resolution = DependencyGraph::new(blocks).sort();
        for block in blocks {
            for required in &block.requires {
                if !blocks.contains(required) {
                    resolution.diagnostics.push(Diagnostic::Missing {
                        consumer: Some(block.name.clone()),
                        name: required.clone(),
                    });
                }
            }
        }
        self.report(resolution)
    }

    /// Collect file paths per extension in block, level and discovery order
    ///
    /// Extensions outside the configured allow-list are dropped; files
    /// without an extension never form a group.
    pub fn group(&self, blocks: &Pool<Block>) -> Vec<ExtensionGroup> {
        let mut groups: Vec<ExtensionGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for file in blocks.iter().flat_map(Block::files) {
            let Some(extension) = file.extension.as_deref() else {
                continue;
            };
            if !self.config.builds_extension(extension) {
                continue;
            }
            let position = *positions.entry(extension).or_insert_with(|| {
                groups.push(ExtensionGroup {
                    extension: extension.to_string(),
                    files: Vec::new(),
                });
                groups.len() - 1
            });
            groups[position].files.push(file.path.clone());
        }

        for group in &groups {
            self.sink.emit(&BuildEvent::GroupFormed {
                extension: group.extension.clone(),
                files: group.files.len(),
            });
        }
        groups
    }

    /// Concatenate and write every group
    ///
    /// All groups are attempted. If any fails, the others are still on disk
    /// and the error is [`BemakerError::PartialBuild`].
    pub async fn write(&self, groups: &[ExtensionGroup], cache: &FileCache) -> Result<Vec<Artifact>> {
        let outdir = &self.config.outdir;
        tokio::fs::create_dir_all(outdir)
            .await
            .with_file_context(FileOperation::CreateDir, outdir, "creating the output directory")?;

        let results = join_all(groups.iter().map(|group| self.write_group(group, cache))).await;

        let mut artifacts = Vec::new();
        let mut failed = Vec::new();
        for (group, result) in groups.iter().zip(results) {
            match result {
                Ok(artifact) => {
                    self.sink.emit(&BuildEvent::FileWritten {
                        path: artifact.path.clone(),
                        bytes: artifact.content.len(),
                    });
                    artifacts.push(artifact);
                }
                Err(error) => {
                    failed.push((self.config.artifact_path(&group.extension), format!("{error:#}")));
                }
            }
        }

        if !failed.is_empty() {
            return Err(BemakerError::PartialBuild {
                failed,
            }
            .into());
        }
        Ok(artifacts)
    }

    /// Discover, select, order, group and write
    pub async fn build(&self) -> Result<BuildReport> {
        self.config.validate()?;
        if let Ok(mut reported) = self.reported.lock() {
            *reported = Reported::default();
        }

        let cache = FileCache::new();
        let discovered = self.discover(&cache).await.context("Failed to discover blocks")?;
        let selected = self.select(discovered);
        let blocks = self.order(&selected);
        let groups = self.group(&blocks);
        let artifacts = self.write(&groups, &cache).await?;

        info!("Built {} artifact(s) from {} block(s)", artifacts.len(), blocks.len());
        Ok(BuildReport {
            blocks,
            artifacts,
        })
    }

    async fn write_group(&self, group: &ExtensionGroup, cache: &FileCache) -> Result<Artifact> {
        let parts: Vec<Part> = group.files.iter().cloned().map(Part::File).collect();
        let wrapping = Wrapping {
            before: self.config.before.as_ref(),
            after: self.config.after.as_ref(),
            root: &self.config.root,
            extension: &group.extension,
        };
        let content = assemble(&parts, wrapping, cache).await?;

        let path = self.config.artifact_path(&group.extension);
        tokio::fs::write(&path, &content).await.with_file_context(
            FileOperation::Write,
            &path,
            "writing the build artifact",
        )?;

        Ok(Artifact {
            extension: group.extension.clone(),
            path,
            content,
        })
    }

    fn report(&self, resolution: Resolution<Block>) -> Pool<Block> {
        for diagnostic in resolution.diagnostics {
            let first_time =
                self.reported.lock().map(|mut reported| reported.first_time(&diagnostic)).unwrap_or(true);
            if first_time {
                self.sink.emit(&BuildEvent::from(diagnostic));
            }
        }
        resolution.pool
    }
}
