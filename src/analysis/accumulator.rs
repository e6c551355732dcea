//! Merging per-tile digests into the tileset and tilemap
//!
//! The accumulator is pure bookkeeping. The tilemap records every tile at its
//! own cell and the tileset keeps only the first coordinate recorded for each
//! digest. The hashing loop records in row-major order, which makes that first
//! coordinate the row-major first occurrence.

use crate::analysis::digest::TileDigest;
use crate::spatial::grid::{GridDimensions, TileCoordinate};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Unique tile digests with the first coordinate where each appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tileset {
    entries: Vec<(TileDigest, TileCoordinate)>,
    lookup: HashMap<TileDigest, usize>,
}

impl Tileset {
    /// Insert a digest unless it is already known
    ///
    /// Returns `true` if the digest was new.
    pub fn insert_first(&mut self, digest: TileDigest, coordinate: TileCoordinate) -> bool {
        match self.lookup.entry(digest) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                self.entries.push((slot.key().clone(), coordinate));
                slot.insert(self.entries.len() - 1);
                true
            }
        }
    }

    /// First coordinate observed with the given digest
    pub fn coordinate_of(&self, digest: &TileDigest) -> Option<TileCoordinate> {
        self.lookup
            .get(digest)
            .and_then(|&index| self.entries.get(index))
            .map(|&(_, coordinate)| coordinate)
    }

    /// Check whether a digest has been seen
    pub fn contains(&self, digest: &TileDigest) -> bool {
        self.lookup.contains_key(digest)
    }

    /// Number of unique digests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no digest has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digests and their first coordinates in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&TileDigest, TileCoordinate)> {
        self.entries
            .iter()
            .map(|(digest, coordinate)| (digest, *coordinate))
    }
}

/// Digest of every tile in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    /// Number of tile columns
    pub width_in_tiles: u32,
    /// Number of tile rows
    pub height_in_tiles: u32,
    // One slot per cell, indexed by row-major linear index
    tiles: Vec<Option<TileDigest>>,
    populated: usize,
}

impl Tilemap {
    /// Create an empty tilemap for the given grid
    pub fn new(grid: GridDimensions) -> Self {
        Self {
            width_in_tiles: grid.width_in_tiles,
            height_in_tiles: grid.height_in_tiles,
            tiles: vec![None; grid.tile_count()],
            populated: 0,
        }
    }

    /// Grid dimensions of the map
    pub const fn grid(&self) -> GridDimensions {
        GridDimensions {
            width_in_tiles: self.width_in_tiles,
            height_in_tiles: self.height_in_tiles,
        }
    }

    /// Digest stored for a coordinate
    pub fn get(&self, coordinate: TileCoordinate) -> Option<&TileDigest> {
        self.grid()
            .index_of(coordinate)
            .and_then(|index| self.tiles.get(index))
            .and_then(Option::as_ref)
    }

    /// Store a digest for a cell, replacing any previous one
    ///
    /// Returns `false` without storing anything if the coordinate lies outside
    /// the grid.
    fn set(&mut self, coordinate: TileCoordinate, digest: TileDigest) -> bool {
        let Some(slot) = self
            .grid()
            .index_of(coordinate)
            .and_then(|index| self.tiles.get_mut(index))
        else {
            return false;
        };
        if slot.replace(digest).is_none() {
            self.populated += 1;
        }
        true
    }

    /// Number of populated cells
    pub const fn len(&self) -> usize {
        self.populated
    }

    /// Whether no cell has been populated yet
    pub const fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Whether every cell of the grid has a digest
    pub fn is_complete(&self) -> bool {
        self.populated == self.tiles.len()
    }

    /// Populated cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (TileCoordinate, &TileDigest)> {
        let grid = self.grid();
        self.tiles.iter().enumerate().filter_map(move |(index, slot)| {
            let digest = slot.as_ref()?;
            grid.coordinate_of(index).map(|coordinate| (coordinate, digest))
        })
    }
}

/// Outcome of analyzing one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Tile edge length the image was partitioned with
    pub tile_size: u32,
    /// Unique tiles keyed by digest
    pub tileset: Tileset,
    /// Digest of every grid cell
    pub tilemap: Tilemap,
}

impl AnalysisResult {
    /// Number of distinct tile digests
    pub fn unique_tile_count(&self) -> usize {
        self.tileset.len()
    }

    /// Number of cells holding the given digest
    pub fn occurrences(&self, digest: &TileDigest) -> usize {
        self.tilemap
            .iter()
            .filter(|(_, candidate)| *candidate == digest)
            .count()
    }
}

/// Builds an `AnalysisResult` one tile at a time
#[derive(Debug, Clone)]
pub struct ResultAccumulator {
    result: AnalysisResult,
}

impl ResultAccumulator {
    /// Start an empty result for the given grid
    pub fn new(tile_size: u32, grid: GridDimensions) -> Self {
        Self {
            result: AnalysisResult {
                tile_size,
                tileset: Tileset::default(),
                tilemap: Tilemap::new(grid),
            },
        }
    }

    /// Record the digest of the tile at `coordinate`
    ///
    /// The tilemap cell is always written; the tileset only learns digests it
    /// has not seen before. Coordinates outside the grid are ignored and
    /// reported by returning `false`.
    pub fn record(&mut self, coordinate: TileCoordinate, digest: TileDigest) -> bool {
        if self.result.tilemap.grid().index_of(coordinate).is_none() {
            return false;
        }
        self.result.tileset.insert_first(digest.clone(), coordinate);
        self.result.tilemap.set(coordinate, digest)
    }

    /// Number of tiles recorded so far
    pub fn recorded(&self) -> usize {
        self.result.tilemap.len()
    }

    /// Result built so far
    pub const fn partial(&self) -> &AnalysisResult {
        &self.result
    }

    /// Finish accumulation and hand over the result
    pub fn finish(self) -> AnalysisResult {
        self.result
    }
}
