//! textbehind puts text *behind* the subject of a photo.
//!
//! One processing call runs a short, fixed pipeline:
//!
//! 1. **Cut out**: a [`BackgroundRemover`] returns the subject with a transparent background
//! 2. **Render text**: [`render_text_layer`] draws centered, drop-shadowed lines on a transparent layer
//! 3. **Compose**: [`compose`] stacks the original photo, then the text layer, then the cutout
//! 4. **Encode** (optional): [`process_upload`] returns PNG bytes ready for download
//!
//! Everything here is a pure function of its inputs. Fonts come from an ordered [`FontChain`] that
//! always ends in a built-in bitmap face, so rendering never fails for lack of a font; the fallback is
//! reported as a warning instead.
#![forbid(unsafe_code)]

mod assets;
mod composite;
mod config;
mod foundation;
mod pipeline;
mod removal;
mod text;

pub use assets::decode::{decode_image, encode_png, load_image};
pub use composite::{PremulRgba8, alpha_composite, compose, compose_dynamic, fit_to, over, over_in_place};
pub use config::{DEFAULT_TEXT, DOWNLOAD_FILE_NAME, JobConfig, OverlaySettings, RemoverConfig};
pub use foundation::core::{
    Canvas, LINE_BREAK_ESCAPE, MAX_FONT_SIZE, MIN_FONT_SIZE, Rgba8, default_font_size, split_lines,
    validate_font_size,
};
pub use foundation::error::{ErrorKind, TextBehindError, TextBehindResult};
pub use pipeline::{Download, PNG_MIME, Processed, process, process_upload};
pub use removal::{BackgroundRemover, CommandRemover, CutoutFile};
pub use text::bitmap::BitmapFont;
pub use text::font::{
    BUILTIN_FONT_WARNING, FontBytes, FontChain, FontFace, FontFile, FontProbe, FontSource,
    GlyphRaster, InkSpan, LoadedFont, ResolvedFont, SYSTEM_FONT_CANDIDATES,
};
pub use text::layer::{
    BlockLayout, LINE_SPACING_RATIO, LinePlacement, SHADOW_OFFSET, TextLayer, TextSpec,
    layout_block, render_text_layer, render_text_layer_at,
};
