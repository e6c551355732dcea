//! Pixel buffer access for rectangular image regions

use crate::io::configuration::BYTES_PER_PIXEL;
use crate::io::error::{Result, pixel_access_error};
use crate::spatial::grid::PixelRect;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::rc::Rc;
use std::sync::Arc;

/// Source of raw pixel bytes for an image being analyzed
///
/// Regions are returned row-major as RGBA8, `BYTES_PER_PIXEL` bytes per pixel,
/// so identical pixel content always yields identical byte sequences.
pub trait PixelSource {
    /// Image width in pixels
    fn width(&self) -> u32;

    /// Image height in pixels
    fn height(&self) -> u32;

    /// Read the bytes of a rectangular region
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::PixelAccess` if the rectangle is not fully
    /// inside the image or the underlying buffer cannot be read.
    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>>;
}

fn ensure_in_bounds(source: &(impl PixelSource + ?Sized), rect: PixelRect) -> Result<()> {
    if rect.fits_within(source.width(), source.height()) {
        Ok(())
    } else {
        Err(pixel_access_error(
            rect,
            &format!(
                "outside of {}x{} image",
                source.width(),
                source.height()
            ),
        ))
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
        ensure_in_bounds(self, rect)?;

        let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
        let stride = self.dimensions().0 as usize * BYTES_PER_PIXEL;
        let raw = self.as_raw();
        let mut bytes = Vec::with_capacity(rect.area() * BYTES_PER_PIXEL);

        for row in rect.y..rect.y + rect.height {
            let start = row as usize * stride + rect.x as usize * BYTES_PER_PIXEL;
            let slice = raw
                .get(start..start + row_bytes)
                .ok_or_else(|| pixel_access_error(rect, &"pixel buffer shorter than image"))?;
            bytes.extend_from_slice(slice);
        }

        Ok(bytes)
    }
}

impl PixelSource for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
        ensure_in_bounds(self, rect)?;
        Ok(self
            .crop_imm(rect.x, rect.y, rect.width, rect.height)
            .to_rgba8()
            .into_raw())
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
        (**self).read_region(rect)
    }
}

impl<T: PixelSource + ?Sized> PixelSource for Rc<T> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
        (**self).read_region(rect)
    }
}

impl<T: PixelSource + ?Sized> PixelSource for Arc<T> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn read_region(&self, rect: PixelRect) -> Result<Vec<u8>> {
        (**self).read_region(rect)
    }
}
