//! Canonical RGBA pixel storage.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::PixelError;

/// One RGBA sample. Used both for pixels and for palette entries.
pub type Color = rgb::RGBA8;

/// Fully transparent black, the fill for uncovered or cleared pixels.
pub const TRANSPARENT: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Row-major RGBA8 image. `data.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Byte length of a `width`x`height` image with `channels` bytes per pixel,
/// or `None` if it does not fit in `usize`.
pub(crate) fn byte_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
}

impl PixelBuffer {
    /// Wrap an RGBA byte vector. Fails if the length does not match the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelError> {
        if byte_len(width, height, 4) != Some(data.len()) {
            return Err(PixelError::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
                channels: 4,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap bytes already known to match the dimensions.
    pub(crate) fn from_raw_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(byte_len(width, height, 4), Some(data.len()));
        Self {
            width,
            height,
            data,
        }
    }

    /// A fully transparent buffer.
    ///
    /// # Panics
    ///
    /// Panics if the byte length overflows `usize`.
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = byte_len(width, height, 4).expect("buffer dimensions overflow usize");
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Build a buffer from row-major pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Color]) -> Result<Self, PixelError> {
        let data: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Color> + '_ {
        self.data
            .chunks_exact(4)
            .map(|q| Color::new(q[0], q[1], q[2], q[3]))
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get(x, y))
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` if it lies outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.put(x, y, color);
        true
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// In-bounds read; callers guarantee `x < width && y < height`.
    #[inline]
    pub(crate) fn get(&self, x: u32, y: u32) -> Color {
        let o = self.offset(x, y);
        let q = &self.data[o..o + 4];
        Color::new(q[0], q[1], q[2], q[3])
    }

    #[inline]
    pub(crate) fn put(&mut self, x: u32, y: u32, color: Color) {
        let o = self.offset(x, y);
        self.data[o..o + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            PixelError::BufferSizeMismatch {
                len: 15,
                width: 2,
                height: 2,
                channels: 4
            }
        );
    }

    #[test]
    fn pixel_access() {
        let mut buf = PixelBuffer::transparent(3, 2);
        assert!(buf.set_pixel(2, 1, Color::new(1, 2, 3, 4)));
        assert!(!buf.set_pixel(3, 0, Color::new(9, 9, 9, 9)));
        assert_eq!(buf.pixel(2, 1), Some(Color::new(1, 2, 3, 4)));
        assert_eq!(buf.pixel(0, 2), None);
        // (2, 1) lives at byte offset (1 * 3 + 2) * 4
        assert_eq!(&buf.data()[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn from_pixels_matches_iteration() {
        let px = [
            Color::new(10, 20, 30, 255),
            Color::new(40, 50, 60, 0),
        ];
        let buf = PixelBuffer::from_pixels(2, 1, &px).unwrap();
        let back: Vec<Color> = buf.pixels().collect();
        assert_eq!(back, px);
        assert_eq!(buf.pixel_count(), 2);
    }

    #[test]
    fn rect_contains() {
        let r = Rect::new(2, 3, 3, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 4));
        assert!(!r.contains(1, 3));
        assert!(!r.contains(2, 5));
        assert!(!Rect::default().contains(0, 0));
    }
}
