//! Progress indicator for builds
//!
//! A single spinner reports what the pipeline is doing. It is hidden when:
//! - `BEMAKER_NO_PROGRESS` is set to any value
//! - the caller asks for it (`--no-progress`, `--quiet`)
//!
//! [`ProgressSink`] forwards every [`BuildEvent`] to an inner sink and
//! updates the spinner message as levels, groups and artifacts go by.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::events::{BuildEvent, EventSink};

/// Environment variable that disables progress output
pub const NO_PROGRESS_ENV: &str = "BEMAKER_NO_PROGRESS";

/// Checks if progress output should be disabled via the environment
fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A spinner with consistent styling
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Create a ticking spinner, or a hidden one when disabled
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Replace the message next to the spinner
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Whether the spinner draws anything
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// Remove the spinner from the terminal
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Event sink that narrates the build on a [`Spinner`]
pub struct ProgressSink {
    spinner: Spinner,
    inner: Arc<dyn EventSink>,
}

impl ProgressSink {
    /// Drive `spinner` and pass every event on to `inner`
    pub fn new(spinner: Spinner, inner: Arc<dyn EventSink>) -> Self {
        Self {
            spinner,
            inner,
        }
    }
}

impl EventSink for ProgressSink {
    fn emit(&self, event: &BuildEvent) {
        match event {
            BuildEvent::LevelEntered {
                level,
            } => self.spinner.set_message(format!("Scanning {}", level.display())),
            BuildEvent::GroupFormed {
                extension,
                files,
            } => self.spinner.set_message(format!("Concatenating {files} {extension} file(s)")),
            BuildEvent::FileWritten {
                path,
                ..
            } => self.spinner.set_message(format!("Wrote {}", path.display())),
            _ => {}
        }
        self.inner.emit(event);
    }
}
