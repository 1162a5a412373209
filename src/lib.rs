//! Pixel-art buffer core.
//!
//! Everything operates on [`PixelBuffer`], a row-major RGBA8 image:
//!
//! - [`normalize`](mod@normalize): RGB/RGBA bytes at any size → canonical buffer at the target size.
//! - [`median_cut`]: bounded palette from the opaque pixels.
//! - [`remap`]: rewrite pixels to their nearest palette entry, keeping transparency.
//! - [`transform`]: flips, quarter turns, and free-angle rotation.
//! - [`select`](mod@select): magic-wand flood-fill selection.
//!
//! [`pixelate`] chains the first three for the image-import path.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod normalize;
pub mod palette;
pub mod remap;
pub mod select;
pub mod transform;

pub use buffer::{Color, PixelBuffer, Rect, TRANSPARENT};
pub use error::PixelError;
pub use median_cut::quantize;
pub use normalize::{ChannelLayout, SourceImage, normalize};
pub use palette::Palette;
pub use remap::{apply_palette, palette_indices};
pub use select::{Selection, select};
pub use transform::{
    Transform, flip_horizontal, flip_vertical, rotate_90_clockwise, rotate_180,
    rotate_270_clockwise,
};
#[cfg(feature = "std")]
pub use transform::rotate_free;

use alloc::vec::Vec;

/// Smallest accepted sprite edge, in pixels.
pub const MIN_DIMENSION: u32 = 8;
/// Largest accepted sprite edge, in pixels.
pub const MAX_DIMENSION: u32 = 128;
/// Smallest accepted palette size.
pub const MIN_COLORS: u32 = 2;
/// Largest accepted palette size.
pub const MAX_COLORS: u32 = 64;

/// Target sprite size and palette bound for [`pixelate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeConfig {
    /// Output width (8..=128).
    pub width: u32,
    /// Output height (8..=128).
    pub height: u32,
    /// Maximum number of palette colors (2..=64).
    pub max_colors: u32,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            max_colors: 16,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), PixelError> {
        check_range("width", self.width, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range("height", self.height, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range("max_colors", self.max_colors, MIN_COLORS, MAX_COLORS)
    }
}

fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> Result<(), PixelError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PixelError::InvalidConstraint {
            name,
            value,
            min,
            max,
        })
    }
}

/// Quantization result: the remapped sprite and the palette it was mapped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeResult {
    buffer: PixelBuffer,
    palette: Palette,
}

impl QuantizeResult {
    /// The sprite, every visible pixel drawn from [`palette`](Self::palette).
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of colors in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Palette index for each pixel, `None` where transparent.
    pub fn indices(&self) -> Vec<Option<usize>> {
        palette_indices(&self.buffer, &self.palette)
    }

    /// Get the alpha table suitable for a PNG tRNS chunk.
    ///
    /// Returns `None` if all entries are fully opaque (no tRNS needed).
    pub fn alpha_table(&self) -> Option<Vec<u8>> {
        self.palette.alpha_table()
    }

    pub fn into_parts(self) -> (PixelBuffer, Palette) {
        (self.buffer, self.palette)
    }
}

/// Turn an arbitrary RGB/RGBA image into a palette-constrained sprite.
///
/// The config is validated before any pixel is touched.
pub fn pixelate(
    source: &SourceImage<'_>,
    config: &QuantizeConfig,
) -> Result<QuantizeResult, PixelError> {
    config.validate()?;

    // 1. Resample to the sprite size
    let buffer = source.to_pixel_buffer(config.width, config.height)?;

    // 2. Median cut over opaque pixels
    let palette = quantize(&buffer, config.max_colors);

    // 3. Snap every visible pixel to the palette
    let buffer = apply_palette(&buffer, &palette);

    log::debug!(
        "pixelate {}x{} -> {}x{}, {} colors",
        source.width(),
        source.height(),
        config.width,
        config.height,
        palette.len()
    );
    Ok(QuantizeResult { buffer, palette })
}
