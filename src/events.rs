//! Progress and diagnostic events emitted by the build pipeline.
//!
//! The pipeline never prints. It hands every [`BuildEvent`] to an
//! [`EventSink`] supplied by the caller, synchronously and in a
//! deterministic order: discovery events follow level/block/file order even
//! though reads run concurrently. The CLI uses [`TracingSink`]; tests use
//! [`CollectingSink`].

use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::graph::Diagnostic;

/// Something that happened during a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Discovery started walking a level directory
    LevelEntered {
        /// The level directory
        level: PathBuf,
    },
    /// A block directory was found in a level
    BlockFound {
        /// Block name
        block: String,
        /// The level it was found in
        level: PathBuf,
    },
    /// A file was attributed to a block
    FileFound {
        /// Owning block
        block: String,
        /// Absolute file path
        path: PathBuf,
    },
    /// A dependency annotation was read from a block file
    DependencyRead {
        /// Block declaring the dependency
        block: String,
        /// Required block name
        dependency: String,
        /// File the annotation was found in
        path: PathBuf,
    },
    /// Files of one extension were collected for an artifact
    GroupFormed {
        /// Extension including the leading dot
        extension: String,
        /// Number of files in the group
        files: usize,
    },
    /// An artifact was written
    FileWritten {
        /// Output path
        path: PathBuf,
        /// Bytes written
        bytes: usize,
    },
    /// A requirement cycle was found; the path starts and ends with the same block
    CycleDetected {
        /// Block names along the cycle
        path: Vec<String>,
    },
    /// A requirement names a block that is not part of the build
    MissingDependency {
        /// Block holding the requirement; `None` for a requested block
        consumer: Option<String>,
        /// The missing block name
        name: String,
    },
}

impl From<Diagnostic> for BuildEvent {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic {
            Diagnostic::Cycle {
                path,
            } => BuildEvent::CycleDetected {
                path,
            },
            Diagnostic::Missing {
                consumer,
                name,
            } => BuildEvent::MissingDependency {
                consumer,
                name,
            },
        }
    }
}

/// Receiver of build events
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn emit(&self, event: &BuildEvent);
}

impl<F> EventSink for F
where
    F: Fn(&BuildEvent) + Send + Sync,
{
    fn emit(&self, event: &BuildEvent) {
        self(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &BuildEvent) {}
}

/// Logs events through `tracing`
///
/// Discovery at `debug`, artifacts at `info`, cycles and missing
/// dependencies at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &BuildEvent) {
        match event {
            BuildEvent::LevelEntered {
                level,
            } => debug!("Entering level {}", level.display()),
            BuildEvent::BlockFound {
                block,
                level,
            } => debug!("Found block {} in {}", block, level.display()),
            BuildEvent::FileFound {
                block,
                path,
            } => debug!("Found file {} ({})", path.display(), block),
            BuildEvent::DependencyRead {
                block,
                dependency,
                ..
            } => debug!("Block {} requires {}", block, dependency),
            BuildEvent::GroupFormed {
                extension,
                files,
            } => info!("Grouped {} file(s) for {}", files, extension),
            BuildEvent::FileWritten {
                path,
                bytes,
            } => info!("Wrote {} ({} bytes)", path.display(), bytes),
            BuildEvent::CycleDetected {
                path,
            } => warn!("Circular dependency: {}", path.join(" → ")),
            BuildEvent::MissingDependency {
                consumer: Some(consumer),
                name,
            } => warn!("Block {} requires missing block {}", consumer, name),
            BuildEvent::MissingDependency {
                consumer: None,
                name,
            } => warn!("Requested block {} does not exist", name),
        }
    }
}

/// Records events in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<BuildEvent>>,
}

impl CollectingSink {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<BuildEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Cycle paths seen so far
    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::CycleDetected {
                    path,
                } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// `(consumer, missing name)` pairs seen so far
    pub fn missing(&self) -> Vec<(Option<String>, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::MissingDependency {
                    consumer,
                    name,
                } => Some((consumer, name)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &BuildEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
