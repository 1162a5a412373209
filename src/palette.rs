extern crate alloc;
use alloc::vec::Vec;

use crate::buffer::Color;

/// An ordered, bounded set of representative colors.
///
/// Entries carry alpha, but only RGB takes part in nearest-color matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Color>,
}

impl Palette {
    pub fn from_colors(entries: Vec<Color>) -> Self {
        Self { entries }
    }

    /// Palette entries in order.
    pub fn entries(&self) -> &[Color] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.entries.get(index).copied()
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Color> {
        self.entries.iter()
    }

    /// Index of the entry closest to `color` in RGB (brute force).
    ///
    /// Ties go to the lowest index. Returns `None` for an empty palette.
    pub fn nearest(&self, color: Color) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let d = distance_sq(color, *entry);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
            if d == 0 {
                break;
            }
        }
        best.map(|(i, _)| i)
    }

    /// Alpha values suitable for a PNG tRNS chunk.
    ///
    /// Truncated after the last non-255 value. Returns `None` if every entry is opaque.
    pub fn alpha_table(&self) -> Option<Vec<u8>> {
        let last_non_opaque = self.entries.iter().rposition(|e| e.a != 255)?;
        Some(self.entries[..=last_non_opaque].iter().map(|e| e.a).collect())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = core::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Squared Euclidean distance over RGB; alpha is ignored.
#[inline]
pub fn distance_sq(a: Color, b: Color) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}
