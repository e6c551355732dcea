//! Tile grid geometry and image dimension validation
//!
//! A tilemap image is partitioned into square tiles of `tile_size` pixels.
//! Tiles are addressed by grid coordinate and visited in row-major order,
//! so every coordinate also has a linear index `y * width_in_tiles + x`.

use crate::io::error::{AnalysisError, Result};
use std::fmt;

/// Image side checked during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal extent
    Width,
    /// Vertical extent
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
        }
    }
}

/// Position of a tile in the grid, measured in tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoordinate {
    /// Column, `0 <= x < width_in_tiles`
    pub x: u32,
    /// Row, `0 <= y < height_in_tiles`
    pub y: u32,
}

impl TileCoordinate {
    /// Create a coordinate from column and row
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

// Matches the `x/y` keys used by tilemap consumers
impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Create a rectangle from origin and extent
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the rectangle lies entirely inside an image of the given size
    pub const fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        match (self.x.checked_add(self.width), self.y.checked_add(self.height)) {
            (Some(right), Some(bottom)) => right <= image_width && bottom <= image_height,
            _ => false,
        }
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} region at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Size of the tile grid derived from image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    /// Number of tile columns
    pub width_in_tiles: u32,
    /// Number of tile rows
    pub height_in_tiles: u32,
}

impl GridDimensions {
    /// Validate image dimensions against the tile size and derive the grid
    ///
    /// Width is checked before height. A zero-length side is rejected because
    /// the grid must contain at least one tile in each direction.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidDimension` naming the offending axis if
    /// that side is zero or not an exact multiple of `tile_size`, and
    /// `AnalysisError::InvalidParameter` if `tile_size` is zero.
    pub fn from_image(width: u32, height: u32, tile_size: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(crate::io::error::invalid_parameter(
                "tile_size",
                &tile_size,
                &"must be positive",
            ));
        }

        let width_in_tiles = tiles_along(Axis::Width, width, tile_size)?;
        let height_in_tiles = tiles_along(Axis::Height, height, tile_size)?;

        Ok(Self {
            width_in_tiles,
            height_in_tiles,
        })
    }

    /// Total number of tiles in the grid
    pub const fn tile_count(&self) -> usize {
        self.width_in_tiles as usize * self.height_in_tiles as usize
    }

    /// Map a row-major linear index to its grid coordinate
    ///
    /// Returns `None` for indices past the end of the grid.
    pub const fn coordinate_of(&self, index: usize) -> Option<TileCoordinate> {
        if index >= self.tile_count() {
            return None;
        }
        let width = self.width_in_tiles as usize;
        Some(TileCoordinate {
            x: (index % width) as u32,
            y: (index / width) as u32,
        })
    }

    /// Map a grid coordinate to its row-major linear index
    ///
    /// Returns `None` for coordinates outside the grid.
    pub const fn index_of(&self, coordinate: TileCoordinate) -> Option<usize> {
        if coordinate.x >= self.width_in_tiles || coordinate.y >= self.height_in_tiles {
            return None;
        }
        Some(coordinate.y as usize * self.width_in_tiles as usize + coordinate.x as usize)
    }

    /// All coordinates in row-major order
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> + use<> {
        let grid = *self;
        (0..grid.tile_count()).filter_map(move |index| grid.coordinate_of(index))
    }
}

/// Pixel rectangle covered by a tile
pub const fn tile_rect(coordinate: TileCoordinate, tile_size: u32) -> PixelRect {
    PixelRect {
        x: coordinate.x * tile_size,
        y: coordinate.y * tile_size,
        width: tile_size,
        height: tile_size,
    }
}

fn tiles_along(axis: Axis, length: u32, tile_size: u32) -> Result<u32> {
    if length == 0 || length % tile_size != 0 {
        return Err(AnalysisError::InvalidDimension {
            axis,
            length,
            tile_size,
        });
    }
    Ok(length / tile_size)
}
