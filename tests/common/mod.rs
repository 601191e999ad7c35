//! Shared helpers for the integration suite

#![allow(dead_code)]

use assert_cmd::Command;
use bemaker::test_utils::LevelFixture;
use std::fs;
use std::path::{Path, PathBuf};

/// A project directory plus a way to run the binary inside it
pub struct TestProject {
    fixture: LevelFixture,
}

impl TestProject {
    /// Empty project
    pub fn new() -> Self {
        Self {
            fixture: LevelFixture::new(),
        }
    }

    /// Add a block with a `.js` file declaring `requires` and a `.css` file
    pub fn with_block(self, level: &str, name: &str, requires: &[&str]) -> Self {
        Self {
            fixture: self.fixture.block(level, name, requires),
        }
    }

    /// Add an arbitrary file
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        Self {
            fixture: self.fixture.file(relative, content),
        }
    }

    /// Write `bemaker.toml`
    pub fn with_project_file(self, content: &str) -> Self {
        Self {
            fixture: self.fixture.project_file(content),
        }
    }

    /// Project root
    pub fn path(&self) -> &Path {
        self.fixture.path()
    }

    /// Path under the project root
    pub fn join(&self, relative: &str) -> PathBuf {
        self.fixture.path().join(relative)
    }

    /// Read a file under the project root
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// `bemaker` with the project as working directory, no spinner, no colors
    pub fn bemaker(&self) -> Command {
        let mut cmd = Command::cargo_bin("bemaker").unwrap();
        cmd.current_dir(self.path())
            .env("BEMAKER_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}
