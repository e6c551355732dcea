//! Diagnostic sinks for analysis progress and failures
//!
//! The hashing loop never talks to a logging backend directly; it reports to an
//! `AnalysisLogger`. Reporting methods return nothing, so a sink cannot change
//! the outcome of an analysis.

use crate::io::error::{AnalysisError, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Receiver of progress observations and errors
pub trait AnalysisLogger {
    /// A tile with the given index is about to be hashed
    fn progress(&self, index: usize, total: usize);

    /// An analysis is about to fail with the given error
    fn error(&self, error: &AnalysisError);
}

/// Logger that forwards to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl AnalysisLogger for LogLogger {
    fn progress(&self, index: usize, total: usize) {
        log::info!("Hashing tile {index} out of {total}...");
    }

    fn error(&self, error: &AnalysisError) {
        log::error!("{error}");
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl AnalysisLogger for NoOpLogger {
    #[inline]
    fn progress(&self, _index: usize, _total: usize) {}

    #[inline]
    fn error(&self, _error: &AnalysisError) {}
}

/// Start the global logging backend, writing to stderr
///
/// The returned handle must be kept alive for as long as logging is needed.
///
/// # Errors
///
/// Returns `AnalysisError::LoggerInit` if the level specification is invalid
/// or a global logger is already installed.
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_str(level)
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| AnalysisError::LoggerInit {
            reason: e.to_string(),
        })
}
