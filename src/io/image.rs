//! PNG loading for command-line analysis

use crate::io::error::{AnalysisError, Result};
use image::RgbaImage;
use std::path::Path;

/// Load an image from disk and convert it to RGBA8
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoad` carrying the path if the file cannot be
/// opened or decoded.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|e| AnalysisError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Check whether a path names a PNG file by extension
pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
