extern crate alloc;
use alloc::vec::Vec;

use crate::buffer::{Color, PixelBuffer};
use crate::histogram::{distinct_colors, opaque_pixels, rounded_mean};
use crate::palette::Palette;

/// A bucket of opaque pixels for median cut subdivision.
#[derive(Debug, Clone)]
struct ColorBox {
    entries: Vec<Color>,
}

impl ColorBox {
    fn new(entries: Vec<Color>) -> Self {
        Self { entries }
    }

    /// Compute the range (max - min) along each of R, G, B.
    fn ranges(&self) -> [u8; 3] {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];

        for c in &self.entries {
            for (axis, v) in [c.r, c.g, c.b].into_iter().enumerate() {
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }

        if self.entries.is_empty() {
            return [0; 3];
        }
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    /// Widest channel range; the split priority.
    fn max_range(&self) -> u8 {
        let [r, g, b] = self.ranges();
        r.max(g).max(b)
    }

    /// A box holding a single RGB value cannot be split into distinct colors.
    fn is_splittable(&self) -> bool {
        self.entries.len() >= 2 && self.max_range() > 0
    }

    /// Rounded mean of every channel, alpha included.
    fn mean(&self) -> Color {
        let n = self.entries.len() as u64;
        let mut sum = [0u64; 4];
        for c in &self.entries {
            sum[0] += c.r as u64;
            sum[1] += c.g as u64;
            sum[2] += c.b as u64;
            sum[3] += c.a as u64;
        }
        Color::new(
            rounded_mean(sum[0], n),
            rounded_mean(sum[1], n),
            rounded_mean(sum[2], n),
            rounded_mean(sum[3], n),
        )
    }

    /// Sort along the widest axis (R, G, B on ties) and split at the midpoint index.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let [rr, rg, rb] = self.ranges();

        let axis = if rr >= rg && rr >= rb {
            0
        } else if rg >= rb {
            1
        } else {
            2
        };

        // Stable, so equal keys keep scan order
        self.entries.sort_by_key(|c| match axis {
            0 => c.r,
            1 => c.g,
            _ => c.b,
        });

        let mid = self.entries.len() / 2;
        let right = self.entries.split_off(mid);
        (ColorBox::new(self.entries), ColorBox::new(right))
    }
}

/// Derive a palette of at most `max_colors` entries from the buffer's opaque pixels.
///
/// Fully transparent pixels never contribute. When the image already has no
/// more than `max_colors` distinct RGB values, those values are returned as-is
/// (first-occurrence order, averaged alpha) without any splitting.
pub fn quantize(buffer: &PixelBuffer, max_colors: u32) -> Palette {
    let pixels = opaque_pixels(buffer);
    if pixels.is_empty() || max_colors == 0 {
        log::debug!(
            "median cut: {} opaque pixels, max_colors={max_colors}, empty palette",
            pixels.len()
        );
        return Palette::default();
    }

    let max_colors = max_colors as usize;
    let distinct = distinct_colors(&pixels);
    if distinct.len() <= max_colors {
        log::debug!(
            "median cut: {} distinct colors fit in {max_colors}, no splitting",
            distinct.len()
        );
        return Palette::from_colors(distinct.iter().map(|e| e.color()).collect());
    }
    let opaque = pixels.len();

    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox::new(pixels));

    while boxes.len() < max_colors {
        // First box with the widest range wins ties
        let mut best: Option<(usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if !b.is_splittable() {
                continue;
            }
            let range = b.max_range();
            if best.is_none_or(|(_, r)| range > r) {
                best = Some((i, range));
            }
        }

        let Some((idx, range)) = best else {
            break; // No more splittable boxes
        };
        log::trace!(
            "median cut: splitting box {idx} ({} pixels, range {range})",
            boxes[idx].entries.len()
        );

        let to_split = boxes.remove(idx);
        let (left, right) = to_split.split();
        boxes.insert(idx, right);
        boxes.insert(idx, left);
    }

    log::debug!(
        "median cut: {opaque} opaque pixels, {} distinct colors -> {} entries",
        distinct.len(),
        boxes.len()
    );
    Palette::from_colors(boxes.iter().map(ColorBox::mean).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn opaque(v: u8) -> Color {
        Color::new(v, v, v, 255)
    }

    fn buffer_of(pixels: &[Color]) -> PixelBuffer {
        PixelBuffer::from_pixels(pixels.len() as u32, 1, pixels).unwrap()
    }

    #[test]
    fn empty_buffer() {
        let buf = PixelBuffer::transparent(4, 4);
        assert!(quantize(&buf, 16).is_empty());
    }

    #[test]
    fn zero_max_colors() {
        assert!(quantize(&buffer_of(&[opaque(1)]), 0).is_empty());
    }

    #[test]
    fn fewer_colors_than_max() {
        let buf = buffer_of(&[opaque(200), opaque(10), opaque(200)]);
        let pal = quantize(&buf, 16);
        assert_eq!(pal.entries(), &[opaque(200), opaque(10)]);
    }

    #[test]
    fn produces_requested_count() {
        let px: Vec<Color> = (0..100).map(|i| opaque(i as u8 * 2)).collect();
        let pal = quantize(&buffer_of(&px), 8);
        assert_eq!(pal.len(), 8);
    }

    #[test]
    fn splits_widest_axis_at_midpoint() {
        // Blue has the widest range; four pixels split into two pairs
        let px = [
            Color::new(0, 0, 200, 255),
            Color::new(0, 0, 0, 255),
            Color::new(2, 0, 210, 255),
            Color::new(2, 0, 10, 255),
        ];
        let pal = quantize(&buffer_of(&px), 2);
        assert_eq!(
            pal.entries(),
            &[Color::new(1, 0, 5, 255), Color::new(1, 0, 205, 255)]
        );
    }

    #[test]
    fn mean_includes_alpha() {
        let px = [
            Color::new(0, 0, 0, 100),
            Color::new(0, 0, 1, 201),
            Color::new(255, 255, 255, 255),
            Color::new(255, 255, 255, 255),
        ];
        let pal = quantize(&buffer_of(&px), 2);
        assert_eq!(pal.len(), 2);
        // (100 + 201) / 2 = 150.5 rounds up
        assert_eq!(pal.entries()[0], Color::new(0, 0, 1, 151));
        assert_eq!(pal.entries()[1], Color::new(255, 255, 255, 255));
    }

    #[test]
    fn duplicated_colors_split_by_pixel_count() {
        // Midpoint is by pixel index, so the dark half absorbs part of the middle run
        let mut px = vec![opaque(0); 10];
        px.extend(vec![opaque(128); 10]);
        px.extend(vec![opaque(255); 10]);
        let pal = quantize(&buffer_of(&px), 2);
        // 10 x 0 + 5 x 128 over 15 pixels, and 5 x 128 + 10 x 255 over 15
        assert_eq!(pal.entries(), &[opaque(43), opaque(213)]);
    }

    #[test]
    fn first_widest_box_wins_ties() {
        // After the first cut both halves have range 10; the left one is split
        let px: Vec<Color> = [0u8, 10, 100, 110]
            .iter()
            .map(|&r| Color::new(r, 0, 0, 255))
            .collect();
        let pal = quantize(&buffer_of(&px), 3);
        assert_eq!(
            pal.entries(),
            &[
                Color::new(0, 0, 0, 255),
                Color::new(10, 0, 0, 255),
                Color::new(105, 0, 0, 255)
            ]
        );
    }

    #[test]
    fn split_halves_replace_parent_in_place() {
        // Right half is wider, so its pieces land after the untouched left box
        let px: Vec<Color> = [130u8, 0, 100, 10]
            .iter()
            .map(|&r| Color::new(r, 0, 0, 255))
            .collect();
        let pal = quantize(&buffer_of(&px), 3);
        assert_eq!(
            pal.entries(),
            &[
                Color::new(5, 0, 0, 255),
                Color::new(100, 0, 0, 255),
                Color::new(130, 0, 0, 255)
            ]
        );
    }

    #[test]
    fn deterministic() {
        let px: Vec<Color> = (0..64u32)
            .map(|i| Color::new((i * 37 % 256) as u8, (i * 11 % 256) as u8, (i * 5) as u8, 255))
            .collect();
        let buf = buffer_of(&px);
        assert_eq!(quantize(&buf, 7), quantize(&buf, 7));
    }
}
