//! Command-line interface for hashing the tiles of PNG tilemaps

use crate::algorithm::analyzer::TileAnalyzer;
use crate::algorithm::scheduler::EventLoop;
use crate::analysis::accumulator::AnalysisResult;
use crate::analysis::digest::Sha256Hasher;
use crate::io::configuration::{
    AnalysisOptions, DEFAULT_BATCH_SIZE, DEFAULT_LOG_LEVEL, DEFAULT_TILE_SIZE,
};
use crate::io::error::{AnalysisError, Result, invalid_parameter};
use crate::io::image::{is_png, load_rgba};
use crate::io::logging::{AnalysisLogger, LogLogger};
use crate::io::progress::ProgressManager;
use clap::Parser;
use image::RgbaImage;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tilehash")]
#[command(
    author,
    version,
    about = "Split tilemap images into tiles and build a deduplicated tileset"
)]
/// Command-line arguments for the tile hashing tool
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Tiles hashed per scheduling quantum
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not log analysis errors before reporting them
    #[arg(long)]
    pub no_error_log: bool,

    /// Log level specification (e.g. "info", "debug")
    #[arg(short, long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Analysis options selected by the flags
    pub const fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            tile_size: self.tile_size,
            log_progress: self.should_show_progress(),
            log_errors: !self.no_error_log,
            batch_size: self.batch_size,
        }
    }
}

/// Per-file outcome reported by the processor
#[derive(Debug, Clone)]
pub struct FileSummary {
    /// Image that was analyzed
    pub path: PathBuf,
    /// Number of tile columns
    pub width_in_tiles: u32,
    /// Number of tile rows
    pub height_in_tiles: u32,
    /// Number of distinct tiles
    pub unique_tiles: usize,
}

impl FileSummary {
    fn new(path: &Path, result: &AnalysisResult) -> Self {
        Self {
            path: path.to_path_buf(),
            width_in_tiles: result.tilemap.width_in_tiles,
            height_in_tiles: result.tilemap.height_in_tiles,
            unique_tiles: result.unique_tile_count(),
        }
    }

    /// Number of tiles in the grid
    pub const fn total_tiles(&self) -> usize {
        self.width_in_tiles as usize * self.height_in_tiles as usize
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the options or target are invalid, an image cannot
    /// be loaded, or an analysis fails.
    pub fn process(&mut self) -> Result<Vec<FileSummary>> {
        self.cli.analysis_options().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut summaries = Vec::with_capacity(files.len());
        for file in &files {
            summaries.push(self.process_file(file)?);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(summaries)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                Ok(vec![self.cli.target.clone()])
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            let entries =
                std::fs::read_dir(&self.cli.target).map_err(|e| AnalysisError::FileSystem {
                    path: self.cli.target.clone(),
                    operation: "read directory",
                    source: e,
                })?;
            for entry in entries {
                let path = entry?.path();
                if path.is_file() && is_png(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a PNG file or directory",
            ))
        }
    }

    fn process_file(&mut self, input_path: &Path) -> Result<FileSummary> {
        let start_time = Instant::now();
        let options = self.cli.analysis_options();
        let image = load_rgba(input_path)?;

        let result = if let Some(ref mut pm) = self.progress_manager {
            let tiles = (image.width() / options.tile_size.max(1)) as usize
                * (image.height() / options.tile_size.max(1)) as usize;
            let logger = pm.start_file(input_path, tiles);
            let result = Self::run_analysis(input_path, &image, options, logger.clone())?;
            pm.complete_file(&logger);
            result
        } else {
            Self::run_analysis(input_path, &image, options, LogLogger)?
        };

        let summary = FileSummary::new(input_path, &result);
        log::info!(
            "{}: {}x{} tiles, {} unique ({:.2?})",
            input_path.display(),
            summary.width_in_tiles,
            summary.height_in_tiles,
            summary.unique_tiles,
            start_time.elapsed()
        );
        Ok(summary)
    }

    fn run_analysis<L: AnalysisLogger>(
        input_path: &Path,
        image: &RgbaImage,
        options: AnalysisOptions,
        logger: L,
    ) -> Result<AnalysisResult> {
        let analyzer = TileAnalyzer::new(Sha256Hasher).with_logger(logger);
        let outcome = Rc::new(Cell::new(None));

        let mut event_loop = EventLoop::new();
        let slot = Rc::clone(&outcome);
        analyzer.analyze_with_options(&mut event_loop, image, options, move |result| {
            slot.set(Some(result));
        });
        let quanta = event_loop.run_until_idle();
        log::debug!("{}: finished after {quanta} quanta", input_path.display());

        outcome.take().unwrap_or_else(|| {
            Err(AnalysisError::Undelivered {
                path: input_path.to_path_buf(),
            })
        })
    }
}
