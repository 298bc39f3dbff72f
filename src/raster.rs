//! Decoded RGBA raster images.

use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::error::SampleError;

/// A decoded image: dimensions plus RGBA pixels in row-major order.
///
/// The sampler only ever borrows it; pixels are never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap raw RGBA data.
    ///
    /// # Errors
    /// [`SampleError::InvalidImage`] if the image has zero area or the buffer
    /// length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SampleError> {
        if width == 0 || height == 0 {
            return Err(SampleError::InvalidImage(format!(
                "image has zero area ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SampleError::InvalidImage(format!(
                "expected {} bytes of RGBA data for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap RGB data, treating every pixel as fully opaque.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self, SampleError> {
        let pixels = rgb
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();
        Self::from_rgba(width, height, pixels)
    }

    /// Convert any decoded image to RGBA.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, SampleError> {
        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Decode an encoded image (PNG, JPEG, WebP) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, SampleError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| SampleError::InvalidImage(format!("failed to decode image: {}", e)))?;
        Self::from_dynamic(image)
    }

    /// Open and decode an image file.
    pub fn open(path: &Path) -> Result<Self, SampleError> {
        let image = ImageReader::open(path)
            .map_err(|e| {
                SampleError::InvalidImage(format!("failed to open {}: {}", path.display(), e))
            })?
            .with_guessed_format()
            .map_err(|e| {
                SampleError::InvalidImage(format!("failed to read {}: {}", path.display(), e))
            })?
            .decode()
            .map_err(|e| {
                SampleError::InvalidImage(format!("failed to decode {}: {}", path.display(), e))
            })?;
        Self::from_dynamic(image)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, 4 per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
