extern crate alloc;
use alloc::vec::Vec;

use crate::buffer::{Color, PixelBuffer};
use crate::palette::Palette;

/// Replace every visible pixel with its nearest palette entry.
///
/// Pixels with `a == 0` pass through untouched. A visible pixel takes the
/// palette entry's RGB *and* alpha. An empty palette leaves the buffer unchanged.
pub fn apply_palette(buffer: &PixelBuffer, palette: &Palette) -> PixelBuffer {
    if palette.is_empty() {
        return buffer.clone();
    }

    let mut out = buffer.clone().into_data();
    let remap_quad = |q: &mut [u8]| {
        if q[3] == 0 {
            return;
        }
        let c = Color::new(q[0], q[1], q[2], q[3]);
        if let Some(e) = palette.nearest(c).and_then(|i| palette.get(i)) {
            q.copy_from_slice(&[e.r, e.g, e.b, e.a]);
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_exact_mut(4).for_each(remap_quad);
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.chunks_exact_mut(4).for_each(remap_quad);
    }

    PixelBuffer::from_raw_parts(buffer.width(), buffer.height(), out)
}

/// Palette index for each pixel; `None` for transparent pixels.
///
/// Every entry is `None` when the palette is empty. Indices are full-width, so
/// palettes longer than 256 entries resolve correctly; narrowing to a byte is
/// left to the encoder.
pub fn palette_indices(buffer: &PixelBuffer, palette: &Palette) -> Vec<Option<usize>> {
    buffer
        .pixels()
        .map(|p| {
            if p.a == 0 {
                return None;
            }
            palette.nearest(p)
        })
        .collect()
}
