//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use crate::io::error::AnalysisError;
use crate::io::logging::AnalysisLogger;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Progress bar for a single image, usable as an analysis logger
#[derive(Clone)]
pub struct ProgressLogger {
    bar: ProgressBar,
}

impl ProgressLogger {
    /// Wrap an existing progress bar
    pub const fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    /// Create a standalone bar for `total` tiles
    pub fn standalone(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar }
    }

    /// Last reported position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Mark all tiles as hashed
    pub fn finish(&self) {
        if let Some(length) = self.bar.length() {
            self.bar.set_position(length);
        }
        self.set_counter();
        self.bar.finish();
    }

    fn set_counter(&self) {
        let current = self.bar.position();
        let total = self.bar.length().unwrap_or(0);
        let width = total.to_string().len();
        self.bar.set_message(format!("{current:>width$}/{total}"));
    }
}

impl AnalysisLogger for ProgressLogger {
    fn progress(&self, index: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64);
        self.set_counter();
    }

    fn error(&self, error: &AnalysisError) {
        self.bar.abandon_with_message(format!("✗ {error}"));
    }
}

/// Coordinates progress display for batch operations
///
/// Shows one bar per file for the most recent files and adds a single batch
/// bar on top when the file count is too large to show individually.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: VecDeque<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: VecDeque::new(),
            file_count: 0,
        }
    }

    /// Initialize progress display based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
    }

    /// Number of files announced by `initialize`
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Add a bar for a new file and return a logger driving it
    pub fn start_file(&mut self, path: &Path, total_tiles: usize) -> ProgressLogger {
        // Rolling window: drop the oldest bar once the limit is reached
        if self.file_bars.len() >= MAX_INDIVIDUAL_PROGRESS_BARS {
            if let Some(oldest) = self.file_bars.pop_front() {
                self.multi_progress.remove(&oldest);
            }
        }

        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let bar = self
            .multi_progress
            .add(ProgressBar::new(total_tiles as u64));
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(display_name);
        self.file_bars.push_back(bar.clone());

        let logger = ProgressLogger::new(bar);
        logger.set_counter();
        logger
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&self, logger: &ProgressLogger) {
        logger.finish();
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
    }

    /// Number of per-file bars currently displayed
    pub fn visible_bars(&self) -> usize {
        self.file_bars.len()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }
}
