//! Magic-wand region selection.

extern crate alloc;
use alloc::collections::BTreeSet;
use alloc::collections::btree_set;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::{Color, PixelBuffer, Rect};
use crate::error::PixelError;

/// A set of selected pixel coordinates `(x, y)` with its bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pixels: BTreeSet<(u32, u32)>,
    bounds: Rect,
    tolerance: u8,
}

impl Selection {
    fn from_pixels(pixels: BTreeSet<(u32, u32)>, tolerance: u8) -> Self {
        let bounds = bounding_box(&pixels);
        Self {
            pixels,
            bounds,
            tolerance,
        }
    }

    /// The coordinate set, keyed `(x, y)`; see [`iter`](Self::iter) for its order.
    pub fn pixels(&self) -> &BTreeSet<(u32, u32)> {
        &self.pixels
    }

    /// Smallest rectangle containing every selected pixel.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.pixels.contains(&(x, y))
    }

    /// Selected coordinates, ordered by x then y (column by column).
    ///
    /// Use [`row_major`](Self::row_major) or [`mask`](Self::mask) when scanline order matters.
    pub fn iter(&self) -> btree_set::Iter<'_, (u32, u32)> {
        self.pixels.iter()
    }

    /// Selected coordinates in scanline order: y first, then x.
    pub fn row_major(&self) -> Vec<(u32, u32)> {
        let mut coords: Vec<(u32, u32)> = self.pixels.iter().copied().collect();
        coords.sort_unstable_by_key(|&(x, y)| (y, x));
        coords
    }

    /// Row-major mask for a buffer of the given size; `true` where selected.
    pub fn mask(&self, width: u32, height: u32) -> Vec<bool> {
        let mut mask = vec![false; width as usize * height as usize];
        for &(x, y) in &self.pixels {
            if x < width && y < height {
                mask[y as usize * width as usize + x as usize] = true;
            }
        }
        mask
    }
}

fn bounding_box(pixels: &BTreeSet<(u32, u32)>) -> Rect {
    let mut iter = pixels.iter();
    let Some(&(x0, y0)) = iter.next() else {
        return Rect::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
    for &(x, y) in iter {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// `max(|Δr|, |Δg|, |Δb|, |Δa|) <= tolerance`.
#[inline]
pub fn within_tolerance(a: Color, b: Color, tolerance: u8) -> bool {
    a.r.abs_diff(b.r) <= tolerance
        && a.g.abs_diff(b.g) <= tolerance
        && a.b.abs_diff(b.b) <= tolerance
        && a.a.abs_diff(b.a) <= tolerance
}

/// Select pixels matching the seed pixel's color within `tolerance`.
///
/// With `contiguous`, only the 4-connected region grown from the seed is
/// selected. Every candidate is compared against the seed's color, never the
/// neighbor it was reached from, so the region cannot drift along a gradient.
/// Without `contiguous`, every matching pixel in the buffer is selected.
pub fn select(
    buffer: &PixelBuffer,
    seed_x: u32,
    seed_y: u32,
    tolerance: u8,
    contiguous: bool,
) -> Result<Selection, PixelError> {
    let Some(seed) = buffer.pixel(seed_x, seed_y) else {
        return Err(PixelError::SeedOutOfBounds {
            x: seed_x,
            y: seed_y,
            width: buffer.width(),
            height: buffer.height(),
        });
    };

    let pixels = if contiguous {
        flood_fill(buffer, seed_x, seed_y, seed, tolerance)
    } else {
        scan_all(buffer, seed, tolerance)
    };

    log::debug!(
        "select seed=({seed_x}, {seed_y}) tolerance={tolerance} contiguous={contiguous}: {} pixels",
        pixels.len()
    );
    Ok(Selection::from_pixels(pixels, tolerance))
}

/// Iterative 4-connected fill; an explicit stack keeps deep regions off the call stack.
fn flood_fill(
    buffer: &PixelBuffer,
    seed_x: u32,
    seed_y: u32,
    seed: Color,
    tolerance: u8,
) -> BTreeSet<(u32, u32)> {
    let (w, h) = (buffer.width(), buffer.height());
    let mut visited = vec![false; w as usize * h as usize];
    let mut selected = BTreeSet::new();
    let mut stack = vec![(seed_x, seed_y)];
    visited[seed_y as usize * w as usize + seed_x as usize] = true;

    while let Some((x, y)) = stack.pop() {
        selected.insert((x, y));

        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1).filter(|&nx| nx < w), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1).filter(|&ny| ny < h)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let vi = ny as usize * w as usize + nx as usize;
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            if within_tolerance(buffer.get(nx, ny), seed, tolerance) {
                stack.push((nx, ny));
            }
        }
    }

    selected
}

fn scan_all(buffer: &PixelBuffer, seed: Color, tolerance: u8) -> BTreeSet<(u32, u32)> {
    let w = buffer.width();
    buffer
        .pixels()
        .enumerate()
        .filter(|(_, p)| within_tolerance(*p, seed, tolerance))
        .map(|(i, _)| ((i % w as usize) as u32, (i / w as usize) as u32))
        .collect()
}
