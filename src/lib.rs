//! Incremental tile hashing for tilemap images
//!
//! An image is split into fixed-size square tiles, each tile's pixels are
//! hashed, and the digests are merged into a deduplicated tileset and a
//! per-cell tilemap. Hashing runs in small quanta on a cooperative event loop
//! so a host can stay responsive while large maps are analyzed.

#![forbid(unsafe_code)]

/// Event loop, incremental hashing task, and the callback entry point
pub mod algorithm;
/// Tile digests and result accumulation
pub mod analysis;
/// Input/output operations, configuration, logging, and error handling
pub mod io;
/// Tile grid geometry and pixel access
pub mod spatial;

pub use algorithm::analyzer::TileAnalyzer;
pub use algorithm::scheduler::EventLoop;
pub use analysis::accumulator::{AnalysisResult, Tilemap, Tileset};
pub use analysis::digest::{Sha256Hasher, TileDigest, TileHasher};
pub use io::configuration::AnalysisOptions;
pub use io::error::{AnalysisError, Result};
pub use spatial::grid::{GridDimensions, TileCoordinate};
pub use spatial::pixels::PixelSource;
