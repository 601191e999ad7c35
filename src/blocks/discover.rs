//! Level scanning and cross-level block merging.
//!
//! Scanning a level is independent of every other level. Each level walk
//! runs on the blocking pool and annotation reads overlap across levels.
//! Merging is sequential so blocks, files, requirements and events all
//! follow configured level order and walk order.

use anyhow::{Result, anyhow};
use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

use super::{Block, BlockFile, BlockLevel};
use crate::annotations::AnnotationExtractor;
use crate::assembler::FileCache;
use crate::core::BemakerError;
use crate::events::{BuildEvent, EventSink};
use crate::pool::{Pool, PoolError};
use crate::walker::walk;

/// A block as seen in one level
#[derive(Debug)]
pub(super) struct ScannedBlock {
    pub name: String,
    pub files: Vec<BlockFile>,
    /// `(required name, file it was declared in)` in document order
    pub dependencies: Vec<(String, PathBuf)>,
}

/// Everything one level contributes
#[derive(Debug)]
pub(super) struct LevelScan {
    pub level: PathBuf,
    pub blocks: Vec<ScannedBlock>,
}

/// Walk `level`, attribute files to blocks and read their annotations
pub(super) async fn scan_level(
    level: &Path,
    deps_extension: &str,
    extractor: &AnnotationExtractor,
    cache: &FileCache,
) -> Result<LevelScan> {
    if !level.is_dir() {
        return Err(BemakerError::LevelNotFound {
            path: level.display().to_string(),
        }
        .into());
    }

    let mut blocks: Vec<ScannedBlock> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    let root = level.to_path_buf();
    let walked_files = tokio::task::spawn_blocking(move || walk(&root))
        .await
        .map_err(|e| anyhow!("Task join error while walking {}: {}", level.display(), e))??;

    for walked in walked_files {
        let Some(name) = block_name(&walked.relative) else {
            trace!("Skipping {} outside any block", walked.relative.display());
            continue;
        };
        let position = *positions.entry(name.clone()).or_insert_with(|| {
            blocks.push(ScannedBlock {
                name: name.clone(),
                files: Vec::new(),
                dependencies: Vec::new(),
            });
            blocks.len() - 1
        });
        blocks[position].files.push(BlockFile::new(&name, walked.file_name, walked.path));
    }

    let annotated: Vec<(usize, PathBuf)> = blocks
        .iter()
        .enumerate()
        .flat_map(|(position, block)| {
            block
                .files
                .iter()
                .filter(|file| file.extension.as_deref() == Some(deps_extension))
                .map(move |file| (position, file.path.clone()))
        })
        .collect();

    let contents = join_all(annotated.iter().map(|(_, path)| cache.read(path))).await;

    for ((position, path), content) in annotated.into_iter().zip(contents) {
        let content = content?;
        for dependency in extractor.extract(&content) {
            blocks[position].dependencies.push((dependency, path.clone()));
        }
    }

    Ok(LevelScan {
        level: level.to_path_buf(),
        blocks,
    })
}

/// Fold level scans into blocks, in scan order
pub(super) fn merge(scans: Vec<LevelScan>, sink: &dyn EventSink) -> Result<Pool<Block>, PoolError> {
    let mut merged: Vec<Block> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for scan in scans {
        sink.emit(&BuildEvent::LevelEntered {
            level: scan.level.clone(),
        });

        for scanned in scan.blocks {
            sink.emit(&BuildEvent::BlockFound {
                block: scanned.name.clone(),
                level: scan.level.clone(),
            });
            for file in &scanned.files {
                sink.emit(&BuildEvent::FileFound {
                    block: scanned.name.clone(),
                    path: file.path.clone(),
                });
            }

            let position = *positions.entry(scanned.name.clone()).or_insert_with(|| {
                merged.push(Block::new(scanned.name.clone()));
                merged.len() - 1
            });
            let block = &mut merged[position];

            for (dependency, path) in scanned.dependencies {
                sink.emit(&BuildEvent::DependencyRead {
                    block: scanned.name.clone(),
                    dependency: dependency.clone(),
                    path,
                });
                block.add_requirement(&dependency);
            }

            block.levels.push(BlockLevel {
                path: scan.level.clone(),
                files: scanned.files,
            });
        }
    }

    Pool::from_items(merged)
}

/// First directory segment of a level-relative path, if the file is inside one
fn block_name(relative: &Path) -> Option<String> {
    let mut components = relative.components();
    let first = components.next()?;
    components.next()?;
    match first {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::DEFAULT_TAG;
    use crate::events::CollectingSink;
    use crate::test_utils::LevelFixture;

    #[test]
    fn test_block_name() {
        assert_eq!(block_name(Path::new("button/button.css")).as_deref(), Some("button"));
        assert_eq!(block_name(Path::new("button/__icon/button__icon.css")).as_deref(), Some("button"));
        assert_eq!(block_name(Path::new("readme.md")), None);
    }

    #[tokio::test]
    async fn test_scan_level_groups_files_and_reads_annotations() {
        let fixture = LevelFixture::new()
            .file("common/button/button.css", ".button{}")
            .file("common/button/button.js", "/**\n * @bemaker icon\n * @bemaker link\n */")
            .file("common/icon/icon.css", ".icon{}")
            .file("common/notes.txt", "not a block");
        let extractor = AnnotationExtractor::new(DEFAULT_TAG).unwrap();
        let cache = FileCache::new();

        let scan = scan_level(&fixture.level("common"), ".js", &extractor, &cache).await.unwrap();

        let names: Vec<_> = scan.blocks.iter().map(|block| block.name.as_str()).collect();
        assert_eq!(names, vec!["button", "icon"]);
        let files: Vec<_> = scan.blocks[0].files.iter().map(|file| file.basename.as_str()).collect();
        assert_eq!(files, vec!["button.css", "button.js"]);
        let dependencies: Vec<_> =
            scan.blocks[0].dependencies.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(dependencies, vec!["icon", "link"]);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_missing_level() {
        let fixture = LevelFixture::new();
        let extractor = AnnotationExtractor::new(DEFAULT_TAG).unwrap();

        let error = scan_level(&fixture.level("nope"), ".js", &extractor, &FileCache::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BemakerError>(),
            Some(BemakerError::LevelNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_merge_keeps_both_levels_and_dedupes_requires() {
        let fixture = LevelFixture::new()
            .file("common/button/button.css", "a")
            .file("common/button/button.js", "/** @bemaker icon */")
            .file("desktop/button/button.css", "b")
            .file("desktop/button/button.js", "/**\n * @bemaker link\n * @bemaker icon\n */")
            .file("desktop/link/link.css", "c");
        let extractor = AnnotationExtractor::new(DEFAULT_TAG).unwrap();
        let cache = FileCache::new();
        let common = scan_level(&fixture.level("common"), ".js", &extractor, &cache).await.unwrap();
        let desktop = scan_level(&fixture.level("desktop"), ".js", &extractor, &cache).await.unwrap();
        let sink = CollectingSink::new();

        let pool = merge(vec![common, desktop], &sink).unwrap();

        assert_eq!(pool.names(), vec!["button", "link"]);
        let button = pool.get("button").unwrap();
        assert_eq!(button.requires, vec!["icon", "link"]);
        assert_eq!(button.levels.len(), 2);
        assert_eq!(button.levels[0].path, fixture.level("common"));
        assert_eq!(button.levels[1].path, fixture.level("desktop"));
        assert_eq!(button.files().count(), 4);

        let events = sink.events();
        assert_eq!(
            events[0],
            BuildEvent::LevelEntered {
                level: fixture.level("common")
            }
        );
        let dependency_reads =
            events.iter().filter(|event| matches!(event, BuildEvent::DependencyRead { .. })).count();
        assert_eq!(dependency_reads, 3);
    }
}
