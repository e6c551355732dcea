//! Analysis constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

// Default values for configurable parameters
/// Edge length of a tile in pixels
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Number of tiles hashed per scheduling quantum
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Progress is reported for every tile index divisible by this value
pub const PROGRESS_LOG_INTERVAL: usize = 32;

/// Pixel layout handed to hash functions is RGBA8
pub const BYTES_PER_PIXEL: usize = 4;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Log level used by the command-line tool when none is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Options recognized by a single analysis run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Edge length of a tile in pixels
    pub tile_size: u32,
    /// Report hashing progress to the logger
    pub log_progress: bool,
    /// Report failures to the logger before delivering them
    pub log_errors: bool,
    /// Tiles hashed per quantum before yielding to the scheduler
    pub batch_size: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            log_progress: true,
            log_errors: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl AnalysisOptions {
    /// Replace the tile size
    #[must_use]
    pub const fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Replace the batch size
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable progress reporting
    #[must_use]
    pub const fn with_log_progress(mut self, log_progress: bool) -> Self {
        self.log_progress = log_progress;
        self
    }

    /// Enable or disable error reporting
    #[must_use]
    pub const fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }

    /// Check that sizes are positive
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if `tile_size` or
    /// `batch_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be positive",
            ));
        }
        if self.batch_size == 0 {
            return Err(invalid_parameter(
                "batch_size",
                &self.batch_size,
                &"must be positive",
            ));
        }
        Ok(())
    }
}
