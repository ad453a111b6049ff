use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::text::font::{GlyphRaster, InkSpan};

/// Side length of a `font8x8` glyph cell.
const CELL: i32 = 8;

/// Always-available fallback face: the `font8x8` basic set, scaled by nearest neighbour.
///
/// Characters outside the basic set render as `?`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFont;

impl BitmapFont {
    /// Integer upscale factor for a requested pixel size.
    pub fn scale_for(px: f32) -> i32 {
        ((px / CELL as f32).round() as i32).max(1)
    }

    fn glyph(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }

    /// Visit every lit source bit of `line` as `(cell_x, row, col)`.
    fn for_each_bit(line: &str, mut f: impl FnMut(i32, i32, i32)) {
        for (idx, ch) in line.chars().enumerate() {
            let cell_x = idx as i32 * CELL;
            for (row, bits) in Self::glyph(ch).iter().enumerate() {
                for col in 0..CELL {
                    if (bits >> col) & 1 == 1 {
                        f(cell_x, row as i32, col);
                    }
                }
            }
        }
    }
}

impl GlyphRaster for BitmapFont {
    fn ink_span(&self, line: &str, px: f32) -> Option<InkSpan> {
        let s = Self::scale_for(px);
        let mut span: Option<InkSpan> = None;
        Self::for_each_bit(line, |cell_x, _row, col| {
            let x0 = (cell_x + col) * s;
            span = Some(InkSpan::cover(span, x0, x0 + s));
        });
        span
    }

    fn rasterize(&self, line: &str, px: f32, pen: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let s = Self::scale_for(px);
        let (pen_x, top) = pen;
        Self::for_each_bit(line, |cell_x, row, col| {
            let x0 = pen_x + (cell_x + col) * s;
            let y0 = top + row * s;
            for dy in 0..s {
                for dx in 0..s {
                    plot(x0 + dx, y0 + dy, 1.0);
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/bitmap.rs"]
mod tests;
