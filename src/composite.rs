use std::borrow::Cow;

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::error::{TextBehindError, TextBehindResult},
};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> TextBehindResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TextBehindError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Premultiplied working surface that layers are stacked onto bottom-up.
///
/// Pixels no layer ever covered come back from [`LayerStack::finish`] exactly as the base had
/// them; an 8-bit premultiply round trip would otherwise shift translucent colors.
struct LayerStack {
    width: u32,
    height: u32,
    base: Vec<u8>,
    premul: Vec<u8>,
    covered: Vec<bool>,
}

impl LayerStack {
    fn new(base: &RgbaImage) -> Self {
        let (width, height) = base.dimensions();
        let base = base.as_raw().clone();
        let mut premul = base.clone();
        premultiply_rgba8_in_place(&mut premul);
        Self {
            width,
            height,
            covered: vec![false; base.len() / 4],
            base,
            premul,
        }
    }

    fn push(&mut self, layer: &RgbaImage, name: &str) -> TextBehindResult<()> {
        let mut src = layer.as_raw().clone();
        premultiply_rgba8_in_place(&mut src);
        self.push_premultiplied(layer.dimensions(), &src, name)
    }

    fn push_premultiplied(
        &mut self,
        (w, h): (u32, u32),
        src: &[u8],
        name: &str,
    ) -> TextBehindResult<()> {
        if (w, h) != (self.width, self.height) {
            return Err(TextBehindError::validation(format!(
                "{name} is {w}x{h}, expected {}x{}",
                self.width, self.height
            )));
        }
        over_in_place(&mut self.premul, src, 1.0)?;
        for (covered, s) in self.covered.iter_mut().zip(src.chunks_exact(4)) {
            *covered |= s[3] != 0;
        }
        Ok(())
    }

    fn finish(self) -> TextBehindResult<RgbaImage> {
        let mut straight = self.premul;
        unpremultiply_rgba8_in_place(&mut straight);
        for ((out, base), covered) in straight
            .chunks_exact_mut(4)
            .zip(self.base.chunks_exact(4))
            .zip(&self.covered)
        {
            if !covered {
                out.copy_from_slice(base);
            }
        }
        RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| TextBehindError::validation("invalid rgba buffer size"))
    }
}

/// Lanczos3 resample in premultiplied space, so colors of fully transparent pixels never reach
/// visible ones. The result stays premultiplied.
fn resample_premultiplied(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    tracing::debug!(
        from_w = img.width(),
        from_h = img.height(),
        to_w = width,
        to_h = height,
        "resampling cutout"
    );
    let mut premul = img.clone();
    premultiply_rgba8_in_place(&mut premul);
    let mut out = image::imageops::resize(&premul, width, height, FilterType::Lanczos3);
    // Lanczos ringing can push a channel above its alpha.
    for px in out.pixels_mut() {
        let a = px.0[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
    out
}

/// Resample `img` to `width`x`height` with Lanczos3, borrowing it when the size already matches.
///
/// Filtering happens on premultiplied pixels.
pub fn fit_to(img: &RgbaImage, width: u32, height: u32) -> Cow<'_, RgbaImage> {
    if img.dimensions() == (width, height) {
        return Cow::Borrowed(img);
    }
    let mut out = resample_premultiplied(img, width, height);
    unpremultiply_rgba8_in_place(&mut out);
    Cow::Owned(out)
}

/// Alpha-composite `upper` over `lower`. Both must share dimensions.
pub fn alpha_composite(lower: &RgbaImage, upper: &RgbaImage) -> TextBehindResult<RgbaImage> {
    let mut stack = LayerStack::new(lower);
    stack.push(upper, "upper layer")?;
    stack.finish()
}

/// Stack the three layers: original photo, then the text layer, then the cutout subject.
///
/// The cutout is resampled to the original's size when they differ. The text layer must already
/// match the original's size. Inputs are left untouched.
#[tracing::instrument(skip_all, fields(width = original.width(), height = original.height()))]
pub fn compose(
    original: &RgbaImage,
    cutout: &RgbaImage,
    text_layer: &RgbaImage,
) -> TextBehindResult<RgbaImage> {
    let (width, height) = original.dimensions();
    if width == 0 || height == 0 {
        return Err(TextBehindError::validation(
            "original image must have non-zero width/height",
        ));
    }

    if cutout.width() == 0 || cutout.height() == 0 {
        return Err(TextBehindError::validation(
            "cutout must have non-zero width/height",
        ));
    }

    let mut stack = LayerStack::new(original);
    stack.push(text_layer, "text layer")?;
    if cutout.dimensions() == (width, height) {
        stack.push(cutout, "cutout")?;
    } else {
        let resampled = resample_premultiplied(cutout, width, height);
        stack.push_premultiplied(resampled.dimensions(), &resampled, "cutout")?;
    }
    stack.finish()
}

/// [`compose`] for inputs in any pixel format; original and cutout are converted to RGBA8 first.
pub fn compose_dynamic(
    original: &DynamicImage,
    cutout: &DynamicImage,
    text_layer: &RgbaImage,
) -> TextBehindResult<RgbaImage> {
    let original = original.to_rgba8();
    let cutout = cutout.to_rgba8();
    compose(&original, &cutout, text_layer)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
