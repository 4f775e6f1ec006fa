//! Progress reporting for a run over many PDFs.
//!
//! # Usage
//!
//! ```ignore
//! use refmaker::utils::ProgressReporter;
//!
//! let reporter = ProgressReporter::new("Processing papers", 10);
//! for name in names {
//!     reporter.set_message(name);
//!     // Do some work...
//!     reporter.inc();
//! }
//! reporter.finish();
//! ```

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use is_terminal::IsTerminal;

/// Progress reporter with optional terminal output
///
/// Draws an indicatif bar on stderr when stderr is a terminal; otherwise the
/// bar is hidden and only the counters are kept.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    ///
    /// - `name`: Description of the operation
    /// - `total`: Total number of units of work
    pub fn new(name: &str, total: usize) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self::quiet(name, total);
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(name.to_string());
        Self { bar }
    }

    /// Create a quiet reporter that doesn't output anything
    pub fn quiet(name: &str, total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden());
        bar.set_prefix(name.to_string());
        Self { bar }
    }

    /// Show what is being worked on
    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Increment progress by one unit
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Get current progress
    pub fn current(&self) -> usize {
        self.bar.position() as usize
    }

    /// Mark the operation complete and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
