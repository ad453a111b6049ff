use image::{Rgba, RgbaImage};

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    composite::over,
    foundation::{
        core::{Canvas, Rgba8, split_lines},
        error::{TextBehindError, TextBehindResult},
    },
    text::font::{FontChain, InkSpan, ResolvedFont},
};

/// Drop shadow offset, applied to both axes.
pub const SHADOW_OFFSET: i32 = 3;
/// Gap between lines as a fraction of the font size.
pub const LINE_SPACING_RATIO: f32 = 0.2;

/// What to draw on the text layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    pub text: String,
    pub font_size: u32,
    pub color: Rgba8,
}

impl TextSpec {
    pub fn new(text: impl Into<String>, font_size: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            color: Rgba8::WHITE,
        }
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        split_lines(&self.text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePlacement {
    pub text: String,
    /// Left edge of the line's ink.
    pub x: i32,
    /// Top of the line box.
    pub y: f32,
    pub ink: Option<InkSpan>,
}

impl LinePlacement {
    pub fn width(&self) -> i32 {
        self.ink.map_or(0, InkSpan::width)
    }
}

/// Vertical/horizontal placement of every line of a text block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockLayout {
    pub font_size: f32,
    pub spacing: f32,
    /// `(font_size + spacing) * lines - spacing`
    pub block_height: f32,
    pub top: f32,
    pub lines: Vec<LinePlacement>,
}

impl BlockLayout {
    pub fn line_advance(&self) -> f32 {
        self.font_size + self.spacing
    }
}

/// Place each line of `spec` on `canvas`.
///
/// The block is centered vertically unless `y_override` gives its top. Each line is centered
/// horizontally on its own ink width.
pub fn layout_block(
    canvas: Canvas,
    spec: &TextSpec,
    font: &ResolvedFont,
    y_override: Option<f32>,
) -> BlockLayout {
    let lines = spec.lines();
    let font_size = spec.font_size as f32;
    let spacing = font_size * LINE_SPACING_RATIO;
    let block_height = (font_size + spacing) * lines.len() as f32 - spacing;
    let top = y_override.unwrap_or_else(|| ((canvas.height as f32 - block_height) / 2.0).floor());

    let mut y = top;
    let mut placed = Vec::with_capacity(lines.len());
    for text in lines {
        let ink = font.ink_span(&text);
        let width = ink.map_or(0, InkSpan::width);
        let x = (i64::from(canvas.width) - i64::from(width)).div_euclid(2) as i32;
        placed.push(LinePlacement { text, x, y, ink });
        y += font_size + spacing;
    }

    BlockLayout {
        font_size,
        spacing,
        block_height,
        top,
        lines: placed,
    }
}

/// A rendered text layer and what went into it.
#[derive(Clone, Debug)]
pub struct TextLayer {
    pub image: RgbaImage,
    pub layout: BlockLayout,
    pub font_label: String,
    /// Non-fatal notices, e.g. the built-in font fallback.
    pub warnings: Vec<String>,
}

/// Render `spec` centered on a transparent `canvas`-sized layer, with a drop shadow.
pub fn render_text_layer(
    canvas: Canvas,
    spec: &TextSpec,
    fonts: &FontChain,
) -> TextBehindResult<TextLayer> {
    render_text_layer_at(canvas, spec, fonts, None)
}

/// Like [`render_text_layer`], but `y_override` replaces the vertically centered block top.
#[tracing::instrument(skip(spec, fonts), fields(font_size = spec.font_size))]
pub fn render_text_layer_at(
    canvas: Canvas,
    spec: &TextSpec,
    fonts: &FontChain,
    y_override: Option<f32>,
) -> TextBehindResult<TextLayer> {
    if spec.font_size == 0 {
        return Err(TextBehindError::validation("font size must be > 0"));
    }

    let font = fonts.resolve(spec.font_size as f32);
    let mut warnings = Vec::new();
    if let Some(w) = &font.warning {
        tracing::warn!("{w}");
        warnings.push(w.clone());
    }

    let layout = layout_block(canvas, spec, &font, y_override);
    let mut image = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([0, 0, 0, 0]));

    for line in &layout.lines {
        let Some(ink) = line.ink else {
            continue;
        };
        // Shift the pen so the ink's left edge lands on `line.x`.
        let pen_x = line.x - ink.min_x;
        let top = line.y.round() as i32;

        let shadow_pen = (pen_x + SHADOW_OFFSET, top + SHADOW_OFFSET);
        font.rasterize(&line.text, shadow_pen, &mut |x, y, v| {
            stamp(&mut image, x, y, Rgba8::SHADOW, v)
        });
        font.rasterize(&line.text, (pen_x, top), &mut |x, y, v| {
            stamp(&mut image, x, y, spec.color, v)
        });
    }

    Ok(TextLayer {
        image,
        layout,
        font_label: font.label().to_string(),
        warnings,
    })
}

/// Blend `color` at `coverage` onto one pixel; out-of-bounds pixels are clipped.
fn stamp(layer: &mut RgbaImage, x: i32, y: i32, color: Rgba8, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= layer.width() || y >= layer.height() {
        return;
    }

    let mut src = color.to_array();
    premultiply_rgba8_in_place(&mut src);

    let px = layer.get_pixel_mut(x, y);
    let mut dst = px.0;
    premultiply_rgba8_in_place(&mut dst);
    let mut out = over(dst, src, coverage);
    unpremultiply_rgba8_in_place(&mut out);
    px.0 = out;
}

#[cfg(test)]
#[path = "../../tests/unit/text/layer.rs"]
mod tests;
