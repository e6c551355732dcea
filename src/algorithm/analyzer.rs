//! Callback-based entry point driving tile hashing from an event loop
//!
//! `TileAnalyzer::analyze` never runs the callback itself. It validates the
//! request, schedules the first quantum, and returns. Every later quantum is
//! scheduled by the one before it, and the callback fires from inside a tick
//! exactly once, with either the finished result or the first error.

use crate::algorithm::hashing::{Quantum, TileHashingTask};
use crate::algorithm::scheduler::EventLoop;
use crate::analysis::accumulator::AnalysisResult;
use crate::analysis::digest::{Sha256Hasher, TileHasher};
use crate::io::configuration::AnalysisOptions;
use crate::io::error::{AnalysisError, Result};
use crate::io::logging::{AnalysisLogger, LogLogger};
use crate::spatial::pixels::PixelSource;

/// Tile analysis front end pairing a hash function with a diagnostic sink
#[derive(Debug, Clone, Default)]
pub struct TileAnalyzer<H = Sha256Hasher, L = LogLogger> {
    hasher: H,
    logger: L,
}

impl<H: TileHasher> TileAnalyzer<H, LogLogger> {
    /// Create an analyzer that logs through the `log` facade
    pub const fn new(hasher: H) -> Self {
        Self {
            hasher,
            logger: LogLogger,
        }
    }
}

impl<H, L> TileAnalyzer<H, L>
where
    H: TileHasher,
    L: AnalysisLogger,
{
    /// Replace the diagnostic sink
    #[must_use]
    pub fn with_logger<M: AnalysisLogger>(self, logger: M) -> TileAnalyzer<H, M> {
        TileAnalyzer {
            hasher: self.hasher,
            logger,
        }
    }

    /// Hash function in use
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Diagnostic sink in use
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Analyze an image with default options
    ///
    /// See [`TileAnalyzer::analyze_with_options`].
    pub fn analyze<'a, P, F>(&'a self, event_loop: &mut EventLoop<'a>, source: P, callback: F)
    where
        P: PixelSource + 'a,
        F: FnOnce(Result<AnalysisResult>) + 'a,
    {
        self.analyze_with_options(event_loop, source, AnalysisOptions::default(), callback);
    }

    /// Schedule analysis of an image on the event loop
    ///
    /// Validation happens immediately but its outcome, like every other
    /// outcome, reaches `callback` from a scheduled continuation. The callback
    /// is invoked exactly once. Errors are reported to the logger first when
    /// `options.log_errors` is set.
    pub fn analyze_with_options<'a, P, F>(
        &'a self,
        event_loop: &mut EventLoop<'a>,
        source: P,
        options: AnalysisOptions,
        callback: F,
    ) where
        P: PixelSource + 'a,
        F: FnOnce(Result<AnalysisResult>) + 'a,
    {
        let delivery = Delivery {
            logger: &self.logger,
            log_errors: options.log_errors,
            callback,
        };

        match TileHashingTask::new(source, &self.hasher, &self.logger, options) {
            Ok(task) => {
                log::debug!(
                    "Scheduling {} tiles in quanta of {}",
                    task.total(),
                    options.batch_size
                );
                schedule_quantum(event_loop, task, delivery);
            }
            Err(error) => event_loop.schedule(move |_| delivery.fail(error)),
        }
    }

    /// Analyze an image to completion on the calling thread
    ///
    /// Drives the same quanta as the scheduled form without yielding.
    ///
    /// # Errors
    ///
    /// Returns the validation, pixel access, or hashing error that stopped
    /// the analysis, after reporting it to the logger when
    /// `options.log_errors` is set.
    pub fn analyze_blocking<P: PixelSource>(
        &self,
        source: P,
        options: AnalysisOptions,
    ) -> Result<AnalysisResult> {
        let outcome = run_to_completion(source, &self.hasher, &self.logger, options);
        if let Err(ref error) = outcome {
            if options.log_errors {
                self.logger.error(error);
            }
        }
        outcome
    }
}

fn run_to_completion<P, H, L>(
    source: P,
    hasher: &H,
    logger: &L,
    options: AnalysisOptions,
) -> Result<AnalysisResult>
where
    P: PixelSource,
    H: TileHasher,
    L: AnalysisLogger,
{
    let mut task = TileHashingTask::new(source, hasher, logger, options)?;
    loop {
        match task.run_quantum()? {
            Quantum::Pending(next) => task = next,
            Quantum::Complete(result) => return Ok(result),
        }
    }
}

// Single-use sink for the outcome of one analysis
struct Delivery<'a, L, F> {
    logger: &'a L,
    log_errors: bool,
    callback: F,
}

impl<L, F> Delivery<'_, L, F>
where
    L: AnalysisLogger,
    F: FnOnce(Result<AnalysisResult>),
{
    fn complete(self, result: AnalysisResult) {
        (self.callback)(Ok(result));
    }

    fn fail(self, error: AnalysisError) {
        if self.log_errors {
            self.logger.error(&error);
        }
        (self.callback)(Err(error));
    }
}

fn schedule_quantum<'a, P, H, L, F>(
    event_loop: &mut EventLoop<'a>,
    task: TileHashingTask<'a, P, H, L>,
    delivery: Delivery<'a, L, F>,
) where
    P: PixelSource + 'a,
    H: TileHasher,
    L: AnalysisLogger,
    F: FnOnce(Result<AnalysisResult>) + 'a,
{
    event_loop.schedule(move |event_loop| match task.run_quantum() {
        Ok(Quantum::Pending(next)) => schedule_quantum(event_loop, next, delivery),
        Ok(Quantum::Complete(result)) => {
            log::debug!(
                "Hashed {} tiles into {} unique digests",
                result.tilemap.len(),
                result.unique_tile_count()
            );
            delivery.complete(result);
        }
        Err(error) => delivery.fail(error),
    });
}
