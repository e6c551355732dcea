//! Spatial data structures for tile grids
//!
//! This module contains:
//! - Grid geometry and dimension validation
//! - Pixel region access for analyzed images

/// Grid dimensions, coordinates, and validation
pub mod grid;
/// Pixel buffer access for rectangular regions
pub mod pixels;
