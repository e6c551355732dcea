/// Tileset, tilemap, and result accumulation
pub mod accumulator;
/// Tile digests and hash functions
pub mod digest;
