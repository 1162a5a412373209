extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::buffer::{Color, PixelBuffer};

/// A distinct RGB value and the alpha/count accumulated over the pixels carrying it.
#[derive(Debug, Clone)]
pub struct HistEntry {
    pub rgb: [u8; 3],
    /// Sum of alpha over all pixels with this RGB value
    pub alpha_sum: u64,
    /// Number of pixels with this RGB value
    pub count: u32,
}

impl HistEntry {
    /// The color with its averaged alpha.
    pub fn color(&self) -> Color {
        let [r, g, b] = self.rgb;
        Color::new(r, g, b, rounded_mean(self.alpha_sum, self.count as u64))
    }
}

/// Integer mean, rounded half up.
pub(crate) fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)).min(255) as u8
}

/// All pixels with `a > 0`, in row-major order.
pub fn opaque_pixels(buffer: &PixelBuffer) -> Vec<Color> {
    buffer.pixels().filter(|p| p.a > 0).collect()
}

/// Group pixels by RGB value, keeping first-occurrence order.
pub fn distinct_colors(pixels: &[Color]) -> Vec<HistEntry> {
    let mut slots: BTreeMap<[u8; 3], usize> = BTreeMap::new();
    let mut entries: Vec<HistEntry> = Vec::new();

    for p in pixels {
        let key = [p.r, p.g, p.b];
        let slot = *slots.entry(key).or_insert_with(|| {
            entries.push(HistEntry {
                rgb: key,
                alpha_sum: 0,
                count: 0,
            });
            entries.len() - 1
        });
        let e = &mut entries[slot];
        e.alpha_sum += p.a as u64;
        e.count += 1;
    }

    entries
}
