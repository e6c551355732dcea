//! Error types and context management for tile analysis operations

use crate::spatial::grid::{Axis, PixelRect, TileCoordinate};
use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Image side is not an exact positive multiple of the tile size
    InvalidDimension {
        /// Which side of the image failed the check
        axis: Axis,
        /// Length of that side in pixels
        length: u32,
        /// Tile size the side was checked against
        tile_size: u32,
    },

    /// Pixel source could not provide the requested region
    PixelAccess {
        /// Requested rectangle in pixel space
        rect: PixelRect,
        /// Description of the failure
        reason: String,
    },

    /// Hash function failed on a tile's bytes
    Hash {
        /// Tile being hashed, if known at the point of failure
        coordinate: Option<TileCoordinate>,
        /// Description of the failure
        reason: String,
    },

    /// Option or argument validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Event loop went idle before an analysis delivered its outcome
    Undelivered {
        /// Image whose analysis was scheduled
        path: PathBuf,
    },

    /// Logging backend could not be started
    LoggerInit {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension {
                axis,
                length,
                tile_size,
            } => {
                write!(
                    f,
                    "Map {axis} must be a positive multiple of tile size ({length} is not a multiple of {tile_size})"
                )
            }
            Self::PixelAccess { rect, reason } => {
                write!(f, "Failed to read pixels in {rect}: {reason}")
            }
            Self::Hash {
                coordinate: Some(coordinate),
                reason,
            } => {
                write!(f, "Failed to hash tile {coordinate}: {reason}")
            }
            Self::Hash {
                coordinate: None,
                reason,
            } => {
                write!(f, "Failed to hash tile: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Undelivered { path } => {
                write!(
                    f,
                    "Analysis of '{}' stopped without delivering a result",
                    path.display()
                )
            }
            Self::LoggerInit { reason } => {
                write!(f, "Failed to initialize logging: {reason}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Tile being processed when the error occurred
    pub coordinate: Option<TileCoordinate>,
}

/// Enriches errors with the state of the hashing loop
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the tile coordinate
    ///
    /// # Errors
    ///
    /// Propagates the original error with the coordinate applied
    fn with_tile(self, coordinate: TileCoordinate) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Hashers do not know which tile they were given
            if let AnalysisError::Hash { coordinate, .. } = &mut error {
                if coordinate.is_none() {
                    *coordinate = context.coordinate;
                }
            }
            error
        })
    }

    fn with_tile(self, coordinate: TileCoordinate) -> Result<T> {
        self.with_context(ErrorContext {
            coordinate: Some(coordinate),
        })
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a hash error without a coordinate, for use inside hash functions
pub fn hash_error(reason: &impl ToString) -> AnalysisError {
    AnalysisError::Hash {
        coordinate: None,
        reason: reason.to_string(),
    }
}

/// Create a pixel access error for the given rectangle
pub fn pixel_access_error(rect: PixelRect, reason: &impl ToString) -> AnalysisError {
    AnalysisError::PixelAccess {
        rect,
        reason: reason.to_string(),
    }
}
