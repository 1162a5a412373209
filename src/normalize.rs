//! Channel normalization: RGB/RGBA bytes at any size → canonical [`PixelBuffer`]
//! at the target size, nearest-neighbor only.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::{PixelBuffer, byte_len};
use crate::error::PixelError;

/// Interleaved channel layout of a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// 3 bytes per pixel; alpha is synthesized as 255.
    Rgb,
    /// 4 bytes per pixel.
    Rgba,
}

impl ChannelLayout {
    pub fn from_channels(channels: u8) -> Result<Self, PixelError> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(PixelError::UnsupportedChannelLayout(n)),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Borrowed source image as handed over by an image-acquisition collaborator.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    data: &'a [u8],
    layout: ChannelLayout,
    width: u32,
    height: u32,
}

impl<'a> SourceImage<'a> {
    /// Validate the channel count and the byte length against the dimensions.
    pub fn new(data: &'a [u8], channels: u8, width: u32, height: u32) -> Result<Self, PixelError> {
        let layout = ChannelLayout::from_channels(channels)?;
        if byte_len(width, height, layout.channels()) != Some(data.len()) {
            return Err(PixelError::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            data,
            layout,
            width,
            height,
        })
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Resample to `width`x`height` RGBA.
    pub fn to_pixel_buffer(&self, width: u32, height: u32) -> Result<PixelBuffer, PixelError> {
        let Some(len) = byte_len(width, height, 4) else {
            return Err(oversized_target(width, height));
        };
        if len > 0 {
            if self.width == 0 {
                return Err(empty_source("source width"));
            }
            if self.height == 0 {
                return Err(empty_source("source height"));
            }
        }

        let xs = sample_positions(self.width, width);
        let ys = sample_positions(self.height, height);
        let mut out = vec![0u8; len];
        let row_bytes = width as usize * 4;

        let fill_row = |dy: usize, row: &mut [u8]| {
            let sy = ys[dy];
            for (dst, &sx) in row.chunks_exact_mut(4).zip(xs.iter()) {
                self.copy_pixel(sx, sy, dst);
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if row_bytes > 0 {
                out.par_chunks_mut(row_bytes)
                    .enumerate()
                    .for_each(|(dy, row)| fill_row(dy, row));
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            if row_bytes > 0 {
                for (dy, row) in out.chunks_mut(row_bytes).enumerate() {
                    fill_row(dy, row);
                }
            }
        }

        PixelBuffer::new(width, height, out)
    }

    #[inline]
    fn copy_pixel(&self, sx: u32, sy: u32, dst: &mut [u8]) {
        let ch = self.layout.channels();
        let o = (sy as usize * self.width as usize + sx as usize) * ch;
        match self.layout {
            ChannelLayout::Rgb => {
                dst[..3].copy_from_slice(&self.data[o..o + 3]);
                dst[3] = 255;
            }
            ChannelLayout::Rgba => dst.copy_from_slice(&self.data[o..o + 4]),
        }
    }
}

fn empty_source(name: &'static str) -> PixelError {
    PixelError::InvalidConstraint {
        name,
        value: 0,
        min: 1,
        max: u32::MAX,
    }
}

/// Target whose RGBA byte length does not fit in `usize`; only reachable with a non-zero height.
fn oversized_target(width: u32, height: u32) -> PixelError {
    let max = usize::MAX / 4 / (height as usize).max(1);
    PixelError::InvalidConstraint {
        name: "width",
        value: width,
        min: 0,
        max: max.min(u32::MAX as usize) as u32,
    }
}

/// Source coordinate sampled by each target coordinate: the source pixel
/// under the target pixel's center.
fn sample_positions(src: u32, dst: u32) -> Vec<u32> {
    let (src, dst) = (src as u64, dst as u64);
    (0..dst)
        .map(|d| {
            let s = ((2 * d + 1) * src) / (2 * dst);
            s.min(src.saturating_sub(1)) as u32
        })
        .collect()
}

/// Convert a raw RGB or RGBA buffer to a canonical RGBA buffer at the target size.
pub fn normalize(
    data: &[u8],
    channels: u8,
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Result<PixelBuffer, PixelError> {
    SourceImage::new(data, channels, src_width, src_height)?.to_pixel_buffer(dst_width, dst_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_gets_opaque_alpha() {
        let data = [1, 2, 3, 4, 5, 6];
        let buf = normalize(&data, 3, 2, 1, 2, 1).unwrap();
        assert_eq!(buf.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn rgba_same_size_is_copy() {
        let data: Vec<u8> = (0..16).collect();
        let buf = normalize(&data, 4, 2, 2, 2, 2).unwrap();
        assert_eq!(buf.data(), &data[..]);
    }

    #[test]
    fn rejects_bad_channels() {
        assert_eq!(
            normalize(&[0; 8], 2, 2, 2, 2, 2).unwrap_err(),
            PixelError::UnsupportedChannelLayout(2)
        );
        assert_eq!(
            normalize(&[0; 10], 5, 1, 2, 2, 2).unwrap_err(),
            PixelError::UnsupportedChannelLayout(5)
        );
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = normalize(&[0; 11], 3, 2, 2, 4, 4).unwrap_err();
        assert!(matches!(
            err,
            PixelError::BufferSizeMismatch {
                len: 11,
                channels: 3,
                ..
            }
        ));
    }

    #[test]
    fn upscale_repeats_pixels() {
        // 2x1 → 4x2: each source pixel becomes a 2x2 block
        let data = [10, 10, 10, 255, 200, 200, 200, 255];
        let buf = normalize(&data, 4, 2, 1, 4, 2).unwrap();
        for y in 0..2 {
            assert_eq!(buf.pixel(0, y).unwrap().r, 10);
            assert_eq!(buf.pixel(1, y).unwrap().r, 10);
            assert_eq!(buf.pixel(2, y).unwrap().r, 200);
            assert_eq!(buf.pixel(3, y).unwrap().r, 200);
        }
    }

    #[test]
    fn downscale_never_blends() {
        // Checkerboard 4x4 → 2x2: output values must come from the source set
        let mut data = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let buf = normalize(&data, 3, 4, 4, 2, 2).unwrap();
        for p in buf.pixels() {
            assert!(p.r == 0 || p.r == 255);
        }
    }

    #[test]
    fn sample_positions_center() {
        assert_eq!(sample_positions(4, 2), vec![1, 3]);
        assert_eq!(sample_positions(2, 4), vec![0, 0, 1, 1]);
        assert_eq!(sample_positions(5, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn oversized_target_is_constraint_error() {
        let err = normalize(&[1, 2, 3, 4], 4, 1, 1, u32::MAX, u32::MAX).unwrap_err();
        match err {
            PixelError::InvalidConstraint {
                name, value, max, ..
            } => {
                assert_eq!(name, "width");
                assert_eq!(value, u32::MAX);
                assert!(max < u32::MAX);
            }
            other => panic!("expected InvalidConstraint, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_with_target_is_error() {
        let err = normalize(&[], 4, 0, 0, 8, 8).unwrap_err();
        assert!(matches!(err, PixelError::InvalidConstraint { .. }));
    }
}
