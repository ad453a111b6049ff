use image::RgbaImage;

use crate::{
    assets::decode::{decode_image, encode_png},
    composite::compose,
    config::{DOWNLOAD_FILE_NAME, OverlaySettings},
    foundation::{
        core::{Canvas, default_font_size, validate_font_size},
        error::{TextBehindError, TextBehindResult},
    },
    removal::BackgroundRemover,
    text::{
        font::FontChain,
        layer::{TextSpec, render_text_layer},
    },
};

/// MIME type of [`Download::bytes`].
pub const PNG_MIME: &str = "image/png";

/// Result of one processing call.
#[derive(Clone, Debug)]
pub struct Processed {
    pub image: RgbaImage,
    pub font_size: u32,
    pub font_label: String,
    /// Non-fatal notices to show the user.
    pub warnings: Vec<String>,
}

/// Encoded result ready to hand to the user.
#[derive(Clone, Debug)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
    /// Font size the text was drawn at.
    pub font_size: u32,
    pub font_label: String,
    pub warnings: Vec<String>,
}

/// Remove the background, render the text layer, and stack photo, text, and subject.
#[tracing::instrument(
    skip_all,
    fields(width = original.width(), height = original.height())
)]
pub fn process(
    original: &RgbaImage,
    settings: &OverlaySettings,
    remover: &mut dyn BackgroundRemover,
    fonts: &FontChain,
) -> TextBehindResult<Processed> {
    let canvas = Canvas::of(original);
    let font_size = match settings.font_size {
        Some(px) => validate_font_size(px)?,
        None => default_font_size(canvas.height),
    };

    let cutout = remover.remove(original).map_err(|e| match e {
        TextBehindError::Removal(_) => e,
        other => TextBehindError::removal(other.to_string()),
    })?;

    let spec = TextSpec::new(settings.text.clone(), font_size).with_color(settings.color);
    let layer = render_text_layer(canvas, &spec, fonts)?;
    let image = compose(original, &cutout, &layer.image)?;

    tracing::debug!(font_size, font = %layer.font_label, "composited layers");
    Ok(Processed {
        image,
        font_size,
        font_label: layer.font_label,
        warnings: layer.warnings,
    })
}

/// [`process`] starting from uploaded file bytes and ending with PNG bytes.
pub fn process_upload(
    upload: &[u8],
    settings: &OverlaySettings,
    remover: &mut dyn BackgroundRemover,
    fonts: &FontChain,
) -> TextBehindResult<Download> {
    let original = decode_image(upload)?;
    let processed = process(&original, settings, remover, fonts)?;
    let bytes = encode_png(&processed.image)?;
    Ok(Download {
        bytes,
        file_name: DOWNLOAD_FILE_NAME.to_string(),
        mime: PNG_MIME,
        font_size: processed.font_size,
        font_label: processed.font_label,
        warnings: processed.warnings,
    })
}
