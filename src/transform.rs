//! Flips and rotations. Every transform returns a new buffer and copies
//! pixels exactly; only free-angle rotation resamples (nearest-neighbor).

extern crate alloc;

use crate::buffer::PixelBuffer;
#[cfg(feature = "std")]
use crate::buffer::TRANSPARENT;

/// A geometric transform as requested by an editor tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Mirror left-right.
    FlipHorizontal,
    /// Mirror top-bottom.
    FlipVertical,
    /// Rotate 90 degrees clockwise.
    Rotate90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (= 90 counter-clockwise).
    Rotate270,
    /// Rotate by an arbitrary angle in degrees, clockwise positive, with canvas expansion.
    #[cfg(feature = "std")]
    Free(f64),
}

impl Transform {
    /// Whether this transform exchanges width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }

    /// Output dimensions for an input of `width`x`height`.
    pub fn output_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            #[cfg(feature = "std")]
            Self::Free(angle) => rotated_dimensions(width, height, angle),
            t if t.swaps_dimensions() => (height, width),
            _ => (width, height),
        }
    }

    pub fn apply(self, buffer: &PixelBuffer) -> PixelBuffer {
        match self {
            Self::FlipHorizontal => flip_horizontal(buffer),
            Self::FlipVertical => flip_vertical(buffer),
            Self::Rotate90 => rotate_90_clockwise(buffer),
            Self::Rotate180 => rotate_180(buffer),
            Self::Rotate270 => rotate_270_clockwise(buffer),
            #[cfg(feature = "std")]
            Self::Free(angle) => rotate_free(buffer, angle),
        }
    }
}

/// Pixel at `(x, y)` moves to `(width - 1 - x, y)`.
pub fn flip_horizontal(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let mut out = PixelBuffer::transparent(w, h);
    for y in 0..h {
        for x in 0..w {
            out.put(w - 1 - x, y, buffer.get(x, y));
        }
    }
    out
}

/// Pixel at `(x, y)` moves to `(x, height - 1 - y)`.
pub fn flip_vertical(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let row = w as usize * 4;
    let mut out = PixelBuffer::transparent(w, h).into_data();
    if row > 0 {
        for (dst, src) in out.chunks_exact_mut(row).zip(buffer.data().chunks_exact(row).rev()) {
            dst.copy_from_slice(src);
        }
    }
    PixelBuffer::from_raw_parts(w, h, out)
}

/// Output is `height`x`width`; pixel `(x, y)` moves to `(height - 1 - y, x)`.
pub fn rotate_90_clockwise(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let mut out = PixelBuffer::transparent(h, w);
    for y in 0..h {
        for x in 0..w {
            out.put(h - 1 - y, x, buffer.get(x, y));
        }
    }
    out
}

/// Two quarter turns.
pub fn rotate_180(buffer: &PixelBuffer) -> PixelBuffer {
    rotate_90_clockwise(&rotate_90_clockwise(buffer))
}

/// Three quarter turns.
pub fn rotate_270_clockwise(buffer: &PixelBuffer) -> PixelBuffer {
    rotate_90_clockwise(&rotate_180(buffer))
}

/// Fold any angle into `[-180, 180)` degrees. Non-finite angles fold to 0.
pub fn normalize_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let a = degrees % 360.0;
    let a = if a < -180.0 {
        a + 360.0
    } else if a >= 180.0 {
        a - 360.0
    } else {
        a
    };
    // -0.0 and 0.0 must behave identically downstream
    if a == 0.0 { 0.0 } else { a }
}

#[cfg(feature = "std")]
const DIMENSION_EPSILON: f64 = 1e-9;

/// Bounding canvas of a `width`x`height` image rotated by `degrees`.
#[cfg(feature = "std")]
pub fn rotated_dimensions(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let theta = normalize_angle(degrees).to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (width as f64, height as f64);
    let nw = (w * cos + h * sin - DIMENSION_EPSILON).ceil().max(0.0);
    let nh = (w * sin + h * cos - DIMENSION_EPSILON).ceil().max(0.0);
    (nw as u32, nh as u32)
}

/// Rotate by `degrees` (clockwise positive) about the center, expanding the
/// canvas so nothing is clipped. Nearest-neighbor sampling keeps hard edges;
/// canvas area not covered by the source is transparent.
///
/// `NaN` and infinite angles leave the image unrotated.
#[cfg(feature = "std")]
pub fn rotate_free(buffer: &PixelBuffer, degrees: f64) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let (nw, nh) = rotated_dimensions(w, h, degrees);
    log::debug!("rotate {degrees} deg: {w}x{h} -> {nw}x{nh}");

    let theta = normalize_angle(degrees).to_radians();
    let (sin, cos) = theta.sin_cos();
    let (cx_src, cy_src) = (w as f64 / 2.0, h as f64 / 2.0);
    let (cx_dst, cy_dst) = (nw as f64 / 2.0, nh as f64 / 2.0);

    let mut out = PixelBuffer::transparent(nw, nh);
    for dy in 0..nh {
        let uy = dy as f64 + 0.5 - cy_dst;
        for dx in 0..nw {
            let ux = dx as f64 + 0.5 - cx_dst;

            // Inverse rotation of the destination pixel center
            let sx = (ux * cos + uy * sin + cx_src).floor();
            let sy = (-ux * sin + uy * cos + cy_src).floor();

            let color = if sx >= 0.0 && sy >= 0.0 && sx < w as f64 && sy < h as f64 {
                buffer.get(sx as u32, sy as u32)
            } else {
                TRANSPARENT
            };
            out.put(dx, dy, color);
        }
    }
    out
}
