//! Tests for the scheduled analysis entry point

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use std::cell::{Cell, RefCell};
    use tilehash::algorithm::analyzer::TileAnalyzer;
    use tilehash::algorithm::scheduler::EventLoop;
    use tilehash::analysis::accumulator::AnalysisResult;
    use tilehash::analysis::digest::{Sha256Hasher, TileDigest};
    use tilehash::io::configuration::AnalysisOptions;
    use tilehash::io::error::{AnalysisError, Result, hash_error, pixel_access_error};
    use tilehash::io::logging::{AnalysisLogger, NoOpLogger};
    use tilehash::spatial::grid::{PixelRect, TileCoordinate};
    use tilehash::spatial::pixels::PixelSource;

    #[derive(Default)]
    struct RecordingLogger {
        progress: Cell<usize>,
        errors: RefCell<Vec<String>>,
    }

    impl AnalysisLogger for RecordingLogger {
        fn progress(&self, _index: usize, _total: usize) {
            self.progress.set(self.progress.get() + 1);
        }

        fn error(&self, error: &AnalysisError) {
            self.errors.borrow_mut().push(error.to_string());
        }
    }

    // Refuses to read one rectangle and counts every read attempt
    struct FailingSource {
        image: RgbaImage,
        broken: PixelRect,
        reads: Cell<usize>,
    }

    impl PixelSource for FailingSource {
        fn width(&self) -> u32 {
            self.image.width()
        }

        fn height(&self) -> u32 {
            self.image.height()
        }

        fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
            self.reads.set(self.reads.get() + 1);
            if rect == self.broken {
                return Err(pixel_access_error(rect, &"unreadable"));
            }
            self.image.read_region(rect)
        }
    }

    fn solid_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([40, 80, 120, 255]))
    }

    // Tests that the callback never fires before the loop runs and fires once after
    // Verified by invoking the callback directly from analyze
    #[test]
    fn test_callback_is_asynchronous_and_single() {
        let image = solid_image(64, 64);
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(NoOpLogger);
        let calls = Cell::new(0);
        let outcome: RefCell<Option<Result<AnalysisResult>>> = RefCell::new(None);

        let mut event_loop = EventLoop::new();
        analyzer.analyze(&mut event_loop, &image, |result| {
            calls.set(calls.get() + 1);
            *outcome.borrow_mut() = Some(result);
        });
        assert_eq!(calls.get(), 0, "Callback must not run synchronously");
        assert_eq!(event_loop.pending(), 1);

        event_loop.run_until_idle();
        assert_eq!(calls.get(), 1);

        let result = outcome.borrow_mut().take().unwrap().unwrap();
        assert_eq!(result.tile_size, 32);
        assert_eq!(result.tilemap.len(), 4);
        assert_eq!(result.unique_tile_count(), 1);
    }

    // Tests one tick per quantum and yielding between quanta
    // Verified by draining the whole grid in the first quantum
    #[test]
    fn test_yields_between_quanta() {
        let image = solid_image(32, 32);
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(NoOpLogger);
        let options = AnalysisOptions::default()
            .with_tile_size(8)
            .with_batch_size(5);
        let done = Cell::new(false);

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &image, options, |result| {
            assert!(result.is_ok());
            done.set(true);
        });

        // 16 tiles in quanta of 5: three pending quanta then the completing one
        for _ in 0..3 {
            assert!(event_loop.tick());
            assert!(!done.get());
            assert_eq!(event_loop.pending(), 1);
        }
        assert!(event_loop.tick());
        assert!(done.get());
        assert!(event_loop.is_idle());
    }

    // Tests that validation errors are delivered through the callback and logged
    // Verified by returning validation errors directly from analyze
    #[test]
    fn test_validation_error_delivered_once() {
        let image = solid_image(48, 64);
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(RecordingLogger::default());
        let calls = Cell::new(0);
        let failure = RefCell::new(None);

        let mut event_loop = EventLoop::new();
        analyzer.analyze(&mut event_loop, &image, |result| {
            calls.set(calls.get() + 1);
            *failure.borrow_mut() = result.err();
        });
        assert_eq!(calls.get(), 0);

        assert_eq!(event_loop.run_until_idle(), 1);
        assert_eq!(calls.get(), 1);
        assert!(matches!(
            failure.borrow().as_ref(),
            Some(AnalysisError::InvalidDimension { length: 48, .. })
        ));
        assert_eq!(analyzer.logger().errors.borrow().len(), 1);
        assert!(
            analyzer
                .logger()
                .errors
                .borrow()
                .first()
                .is_some_and(|message| message.contains("width"))
        );
    }

    // Tests that a hashing failure halts the loop and cancels further quanta
    // Verified by rescheduling the next quantum after an error
    #[test]
    fn test_hash_error_cancels_remaining_quanta() {
        let image = RgbaImage::from_fn(64, 8, |x, _| Rgba([(x / 8) as u8, 0, 0, 255]));
        let hashed = Cell::new(0);
        let hasher = |bytes: &[u8]| -> Result<TileDigest> {
            hashed.set(hashed.get() + 1);
            match bytes.first() {
                Some(&3) => Err(hash_error(&"corrupt tile")),
                first => Ok(TileDigest::new(format!("{first:?}"))),
            }
        };
        let analyzer = TileAnalyzer::new(hasher).with_logger(RecordingLogger::default());
        let options = AnalysisOptions::default()
            .with_tile_size(8)
            .with_batch_size(2);
        let calls = Cell::new(0);
        let failure = RefCell::new(None);

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &image, options, |result| {
            calls.set(calls.get() + 1);
            *failure.borrow_mut() = result.err();
        });
        event_loop.run_until_idle();

        assert_eq!(calls.get(), 1);
        assert_eq!(hashed.get(), 4, "No tile after the failing one may be hashed");
        assert_eq!(event_loop.ticks(), 2);
        assert!(matches!(
            failure.borrow().as_ref(),
            Some(AnalysisError::Hash {
                coordinate: Some(TileCoordinate { x: 3, y: 0 }),
                ..
            })
        ));
        assert_eq!(analyzer.logger().errors.borrow().len(), 1);
    }

    // Tests that a pixel read failure halts the loop and is logged before delivery
    // Verified by scheduling the next quantum before checking the read result
    #[test]
    fn test_pixel_access_error_halts_loop() {
        let source = FailingSource {
            image: solid_image(32, 32),
            broken: PixelRect::new(16, 8, 8, 8),
            reads: Cell::new(0),
        };
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(RecordingLogger::default());
        let options = AnalysisOptions::default()
            .with_tile_size(8)
            .with_batch_size(3);
        let calls = Cell::new(0);
        let logged_before_delivery = Cell::new(0);
        let failure = RefCell::new(None);

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &source, options, |result| {
            calls.set(calls.get() + 1);
            logged_before_delivery.set(analyzer.logger().errors.borrow().len());
            *failure.borrow_mut() = result.err();
        });
        event_loop.run_until_idle();

        // Tile 6 of 16 is (2, 1): two full quanta, then the failing one
        assert_eq!(calls.get(), 1);
        assert_eq!(source.reads.get(), 7, "No tile after the failing one may be read");
        assert_eq!(event_loop.ticks(), 3);
        assert!(event_loop.is_idle());
        assert_eq!(logged_before_delivery.get(), 1);
        assert!(matches!(
            failure.borrow().as_ref(),
            Some(AnalysisError::PixelAccess { rect, .. }) if *rect == PixelRect::new(16, 8, 8, 8)
        ));
        assert!(
            analyzer
                .logger()
                .errors
                .borrow()
                .first()
                .is_some_and(|message| message.contains("unreadable"))
        );
    }

    // Tests that error logging can be disabled
    #[test]
    fn test_error_logging_disabled() {
        let image = solid_image(10, 10);
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(RecordingLogger::default());
        let options = AnalysisOptions::default().with_log_errors(false);
        let failed = Cell::new(false);

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &image, options, |result| {
            failed.set(result.is_err());
        });
        event_loop.run_until_idle();

        assert!(failed.get());
        assert!(analyzer.logger().errors.borrow().is_empty());
    }

    // Tests that two analyses on one loop interleave without sharing state
    #[test]
    fn test_concurrent_analyses_are_independent() {
        let red = solid_image(32, 32);
        let checker = RgbaImage::from_fn(32, 32, |x, y| {
            if (x / 16 + y / 16) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(NoOpLogger);
        let options = AnalysisOptions::default()
            .with_tile_size(16)
            .with_batch_size(1);
        let order = RefCell::new(Vec::new());
        let results = RefCell::new(Vec::new());

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &red, options, |result| {
            order.borrow_mut().push("red");
            results.borrow_mut().push(result);
        });
        analyzer.analyze_with_options(&mut event_loop, &checker, options, |result| {
            order.borrow_mut().push("checker");
            results.borrow_mut().push(result);
        });
        assert_eq!(event_loop.run_until_idle(), 8);

        assert_eq!(*order.borrow(), vec!["red", "checker"]);
        let unique: Vec<usize> = results
            .borrow()
            .iter()
            .map(|result| result.as_ref().map_or(0, AnalysisResult::unique_tile_count))
            .collect();
        assert_eq!(unique, vec![1, 2]);
    }

    // Tests that the blocking form matches the scheduled form
    #[test]
    fn test_blocking_matches_scheduled() {
        let image = RgbaImage::from_fn(64, 32, |x, y| Rgba([(x / 16) as u8, (y / 16) as u8, 0, 255]));
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(NoOpLogger);
        let options = AnalysisOptions::default().with_tile_size(16);
        let scheduled = RefCell::new(None);

        let mut event_loop = EventLoop::new();
        analyzer.analyze_with_options(&mut event_loop, &image, options, |result| {
            *scheduled.borrow_mut() = Some(result);
        });
        event_loop.run_until_idle();

        let blocking = analyzer.analyze_blocking(&image, options).unwrap();
        let scheduled_result = scheduled.borrow_mut().take().unwrap().unwrap();
        assert_eq!(blocking, scheduled_result);
        assert_eq!(blocking.unique_tile_count(), 8);
    }

    // Tests that the blocking form reports errors to the logger
    #[test]
    fn test_blocking_logs_errors() {
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(RecordingLogger::default());

        let result = analyzer.analyze_blocking(&solid_image(31, 32), AnalysisOptions::default());

        assert!(matches!(result, Err(AnalysisError::InvalidDimension { .. })));
        assert_eq!(analyzer.logger().errors.borrow().len(), 1);
    }
}
