//! Tests for progress bar tracking

#[cfg(test)]
mod tests {
    use std::path::Path;
    use tilehash::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
    use tilehash::io::error::hash_error;
    use tilehash::io::logging::AnalysisLogger;
    use tilehash::io::progress::{ProgressLogger, ProgressManager};

    // Tests that progress reports move the bar to the reported tile index
    // Verified by incrementing the bar instead of setting its position
    #[test]
    fn test_progress_logger_tracks_index() {
        let logger = ProgressLogger::standalone(100);

        logger.progress(32, 100);
        assert_eq!(logger.position(), 32);

        logger.progress(64, 100);
        assert_eq!(logger.position(), 64);

        logger.finish();
        assert_eq!(logger.position(), 100);
    }

    // Tests that an error report leaves the position untouched
    #[test]
    fn test_progress_logger_error() {
        let logger = ProgressLogger::standalone(10);
        logger.progress(5, 10);

        logger.error(&hash_error(&"bad"));

        assert_eq!(logger.position(), 5);
    }

    // Tests the rolling window of per-file bars
    // Verified by never removing old bars
    #[test]
    fn test_manager_rolling_window() {
        let mut manager = ProgressManager::new();
        manager.initialize(MAX_INDIVIDUAL_PROGRESS_BARS + 3);
        assert_eq!(manager.file_count(), MAX_INDIVIDUAL_PROGRESS_BARS + 3);

        for index in 0..MAX_INDIVIDUAL_PROGRESS_BARS + 3 {
            let name = format!("map_{index}.png");
            let logger = manager.start_file(Path::new(&name), 4);
            manager.complete_file(&logger);
            assert_eq!(logger.position(), 4);
        }

        assert_eq!(manager.visible_bars(), MAX_INDIVIDUAL_PROGRESS_BARS);
        manager.finish();
    }

    // Tests a small batch where every file keeps its bar
    #[test]
    fn test_manager_small_batch() {
        let mut manager = ProgressManager::default();
        manager.initialize(2);

        let first = manager.start_file(Path::new("a.png"), 16);
        let second = manager.start_file(Path::new("b.png"), 1);
        first.progress(0, 16);
        manager.complete_file(&first);
        manager.complete_file(&second);

        assert_eq!(manager.visible_bars(), 2);
        assert_eq!(first.position(), 16);
        manager.finish();
    }
}
