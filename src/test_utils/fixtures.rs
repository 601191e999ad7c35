//! On-disk fixtures for level directories
//!
//! A [`LevelFixture`] owns a temporary directory and writes files into it
//! with paths relative to its root, creating parent directories as needed.
//! The directory is removed when the fixture is dropped.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::PROJECT_FILE;

/// Temporary project tree with level directories
#[derive(Debug)]
pub struct LevelFixture {
    root: TempDir,
}

impl Default for LevelFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelFixture {
    /// Create an empty project root
    ///
    /// # Panics
    ///
    /// If the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temporary directory"),
        }
    }

    /// Write `content` to `relative`, e.g. `"common/button/button.css"`
    ///
    /// # Panics
    ///
    /// If the file or its parent directories cannot be written.
    #[must_use]
    pub fn file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    /// Write a block file declaring `requires` with the default tag
    #[must_use]
    pub fn block(self, level: &str, name: &str, requires: &[&str]) -> Self {
        let annotations: String =
            requires.iter().map(|required| format!(" * @bemaker {required}\n")).collect();
        self.file(&format!("{level}/{name}/{name}.js"), &format!("/**\n{annotations} */\n{name}();\n"))
            .file(&format!("{level}/{name}/{name}.css"), &format!(".{name}{{}}\n"))
    }

    /// Write `bemaker.toml` at the root
    #[must_use]
    pub fn project_file(self, content: &str) -> Self {
        self.file(PROJECT_FILE, content)
    }

    /// Write a file in place, without consuming the fixture
    ///
    /// # Panics
    ///
    /// If the file or its parent directories cannot be written.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        fs::write(&path, content).expect("failed to write fixture file");
    }

    /// The project root
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a level directory under the root
    #[must_use]
    pub fn level(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Read a file under the root
    ///
    /// # Panics
    ///
    /// If the file cannot be read.
    #[must_use]
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.path().join(relative)).expect("failed to read fixture file")
    }
}
