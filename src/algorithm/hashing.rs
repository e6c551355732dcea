//! Incremental tile hashing state machine
//!
//! `TileHashingTask` walks the tile grid in row-major order and hashes at most
//! `batch_size` tiles per call to `run_quantum`. Each call consumes the task and
//! either hands it back for the next quantum or returns the finished result, so
//! a failed or completed task can never be advanced again.

use crate::analysis::accumulator::{AnalysisResult, ResultAccumulator};
use crate::analysis::digest::TileHasher;
use crate::io::configuration::{AnalysisOptions, PROGRESS_LOG_INTERVAL};
use crate::io::error::{Result, WithContext, hash_error};
use crate::io::logging::AnalysisLogger;
use crate::spatial::grid::{GridDimensions, tile_rect};
use crate::spatial::pixels::PixelSource;

/// State after one quantum of work
#[derive(Debug)]
pub enum Quantum<T> {
    /// More tiles remain; run another quantum on the returned task
    Pending(T),
    /// Every tile has been hashed
    Complete(AnalysisResult),
}

/// Hashing job for one image, advanced one quantum at a time
pub struct TileHashingTask<'a, P, H: ?Sized, L: ?Sized> {
    source: P,
    hasher: &'a H,
    logger: &'a L,
    options: AnalysisOptions,
    grid: GridDimensions,
    next_index: usize,
    accumulator: ResultAccumulator,
}

impl<'a, P, H, L> TileHashingTask<'a, P, H, L>
where
    P: PixelSource,
    H: TileHasher + ?Sized,
    L: AnalysisLogger + ?Sized,
{
    /// Validate options and image dimensions and prepare an empty result
    ///
    /// No pixels are read and nothing is hashed until the first quantum.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` for a zero tile or batch size
    /// and `AnalysisError::InvalidDimension` if the image is not an exact
    /// multiple of the tile size.
    pub fn new(
        source: P,
        hasher: &'a H,
        logger: &'a L,
        options: AnalysisOptions,
    ) -> Result<Self> {
        options.validate()?;
        let grid = GridDimensions::from_image(source.width(), source.height(), options.tile_size)?;

        Ok(Self {
            source,
            hasher,
            logger,
            options,
            grid,
            next_index: 0,
            accumulator: ResultAccumulator::new(options.tile_size, grid),
        })
    }

    /// Hash the next `batch_size` tiles, or fewer if the grid ends first
    ///
    /// # Errors
    ///
    /// Returns the first pixel access or hashing failure. The task is consumed
    /// and no further tiles are processed.
    pub fn run_quantum(mut self) -> Result<Quantum<Self>> {
        let total = self.total();
        let end = self
            .next_index
            .saturating_add(self.options.batch_size)
            .min(total);

        while self.next_index < end {
            self.hash_tile(self.next_index, total)?;
            self.next_index += 1;
        }

        if self.next_index == total {
            Ok(Quantum::Complete(self.accumulator.finish()))
        } else {
            Ok(Quantum::Pending(self))
        }
    }

    fn hash_tile(&mut self, index: usize, total: usize) -> Result<()> {
        if self.options.log_progress && index % PROGRESS_LOG_INTERVAL == 0 {
            self.logger.progress(index, total);
        }

        let coordinate = self
            .grid
            .coordinate_of(index)
            .ok_or_else(|| hash_error(&format!("tile index {index} is outside the grid")))?;

        let bytes = self
            .source
            .read_region(tile_rect(coordinate, self.options.tile_size))?;
        let digest = self.hasher.hash(&bytes).with_tile(coordinate)?;

        self.accumulator.record(coordinate, digest);
        Ok(())
    }

    /// Grid being walked
    pub const fn grid(&self) -> GridDimensions {
        self.grid
    }

    /// Options the task was created with
    pub const fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Number of tiles hashed so far
    pub const fn processed(&self) -> usize {
        self.next_index
    }

    /// Number of tiles in the grid
    pub const fn total(&self) -> usize {
        self.grid.tile_count()
    }

    /// Result accumulated so far
    pub const fn partial(&self) -> &AnalysisResult {
        self.accumulator.partial()
    }
}
