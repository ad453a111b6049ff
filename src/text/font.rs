use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use rusttype::{Font, Scale, point};

use crate::text::bitmap::BitmapFont;

/// Candidate font files tried in order by [`FontChain::system_default`].
pub const SYSTEM_FONT_CANDIDATES: [&str; 3] = [
    "C:/Windows/Fonts/Impact.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttf",
];

/// Warning recorded when every font source failed and the bitmap face is used instead.
pub const BUILTIN_FONT_WARNING: &str = "using built-in bitmap font; no font source is usable";

/// Horizontal ink extent of a line relative to its pen position; `max_x` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkSpan {
    pub min_x: i32,
    pub max_x: i32,
}

impl InkSpan {
    pub fn width(self) -> i32 {
        self.max_x - self.min_x
    }

    pub(crate) fn cover(acc: Option<Self>, min_x: i32, max_x: i32) -> Self {
        match acc {
            None => Self { min_x, max_x },
            Some(s) => Self {
                min_x: s.min_x.min(min_x),
                max_x: s.max_x.max(max_x),
            },
        }
    }
}

/// Measures and rasterizes a single line of text at a pixel size.
pub trait GlyphRaster {
    /// Ink extent of `line`, or `None` when it produces no visible pixels.
    fn ink_span(&self, line: &str, px: f32) -> Option<InkSpan>;

    /// Call `plot(x, y, coverage)` for each covered pixel. `pen` is the left edge of the line's
    /// layout box and its top (ascender) line.
    fn rasterize(&self, line: &str, px: f32, pen: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32));
}

/// An outline font validated at load time. Holds only the shared font bytes; the face is re-read
/// from them on use.
#[derive(Clone)]
pub struct LoadedFont {
    label: String,
    bytes: Arc<Vec<u8>>,
}

impl LoadedFont {
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        Self::from_shared(label, Arc::new(bytes))
    }

    /// Like [`LoadedFont::from_bytes`], without copying bytes that are already shared.
    pub fn from_shared(label: impl Into<String>, bytes: Arc<Vec<u8>>) -> Option<Self> {
        Font::try_from_bytes(&bytes)?;
        Some(Self {
            label: label.into(),
            bytes,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn face(&self) -> Option<Font<'_>> {
        Font::try_from_bytes(&self.bytes)
    }
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("label", &self.label)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl GlyphRaster for LoadedFont {
    fn ink_span(&self, line: &str, px: f32) -> Option<InkSpan> {
        let font = self.face()?;
        let scale = Scale::uniform(px);
        let ascent = font.v_metrics(scale).ascent;
        let mut span = None;
        for g in font.layout(line, scale, point(0.0, ascent)) {
            if let Some(bb) = g.pixel_bounding_box() {
                span = Some(InkSpan::cover(span, bb.min.x, bb.max.x));
            }
        }
        span
    }

    fn rasterize(&self, line: &str, px: f32, pen: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let Some(font) = self.face() else {
            return;
        };
        let scale = Scale::uniform(px);
        let ascent = font.v_metrics(scale).ascent;
        let origin = point(pen.0 as f32, pen.1 as f32 + ascent);
        for g in font.layout(line, scale, origin) {
            let Some(bb) = g.pixel_bounding_box() else {
                continue;
            };
            g.draw(|gx, gy, v| plot(bb.min.x + gx as i32, bb.min.y + gy as i32, v));
        }
    }
}

/// Outcome of probing one [`FontSource`].
pub enum FontProbe {
    Ready(LoadedFont),
    /// Not usable; try the next source. Carries the reason.
    Next(String),
}

/// One entry in the ordered font fallback chain.
pub trait FontSource {
    fn label(&self) -> String;
    fn load(&self) -> FontProbe;
}

/// Font file on disk.
#[derive(Clone, Debug)]
pub struct FontFile {
    pub path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontSource for FontFile {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> FontProbe {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) => return FontProbe::Next(format!("{}: {e}", self.label())),
        };
        match LoadedFont::from_bytes(self.label(), bytes) {
            Some(font) => FontProbe::Ready(font),
            None => FontProbe::Next(format!("{}: not a parsable TrueType/OpenType font", self.label())),
        }
    }
}

/// Font already held in memory.
#[derive(Clone, Debug)]
pub struct FontBytes {
    pub label: String,
    pub bytes: Arc<Vec<u8>>,
}

impl FontBytes {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes: Arc::new(bytes),
        }
    }
}

impl FontSource for FontBytes {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> FontProbe {
        match LoadedFont::from_shared(self.label.clone(), Arc::clone(&self.bytes)) {
            Some(font) => FontProbe::Ready(font),
            None => FontProbe::Next(format!("{}: not a parsable TrueType/OpenType font", self.label)),
        }
    }
}

/// The face a [`FontChain`] settled on.
#[derive(Clone, Debug)]
pub enum FontFace {
    Outline(LoadedFont),
    Builtin(BitmapFont),
}

/// A face plus the pixel size it is used at.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub face: FontFace,
    pub px: f32,
    /// Set when the chain had to fall back to the built-in face.
    pub warning: Option<String>,
}

impl ResolvedFont {
    pub fn builtin(px: f32) -> Self {
        Self {
            face: FontFace::Builtin(BitmapFont),
            px,
            warning: None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.face {
            FontFace::Outline(f) => f.label(),
            FontFace::Builtin(_) => "built-in 8x8 bitmap",
        }
    }

    /// Raw bytes of the outline font, if one was resolved.
    pub fn source_bytes(&self) -> Option<&[u8]> {
        match &self.face {
            FontFace::Outline(f) => Some(f.bytes()),
            FontFace::Builtin(_) => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, FontFace::Builtin(_))
    }

    pub fn ink_span(&self, line: &str) -> Option<InkSpan> {
        self.raster().ink_span(line, self.px)
    }

    pub fn rasterize(&self, line: &str, pen: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        self.raster().rasterize(line, self.px, pen, plot)
    }

    fn raster(&self) -> &dyn GlyphRaster {
        match &self.face {
            FontFace::Outline(f) => f as &dyn GlyphRaster,
            FontFace::Builtin(b) => b,
        }
    }
}

/// Ordered list of font sources, terminated by the built-in bitmap face.
#[derive(Default)]
pub struct FontChain {
    sources: Vec<Box<dyn FontSource>>,
}

impl FontChain {
    /// A chain with no sources; always resolves to the built-in face.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn system_default() -> Self {
        Self::from_paths(SYSTEM_FONT_CANDIDATES.iter().map(Path::new))
    }

    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let mut chain = Self::empty();
        for p in paths {
            chain.push(FontFile::new(p.as_ref()));
        }
        chain
    }

    /// `preferred` font files first, then the system candidates.
    pub fn with_preferred<P: AsRef<Path>>(preferred: impl IntoIterator<Item = P>) -> Self {
        let mut chain = Self::from_paths(preferred);
        for p in SYSTEM_FONT_CANDIDATES {
            chain.push(FontFile::new(p));
        }
        chain
    }

    pub fn push(&mut self, source: impl FontSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn with_source(mut self, source: impl FontSource + 'static) -> Self {
        self.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order; fall back to the built-in face with a warning.
    pub fn resolve(&self, px: f32) -> ResolvedFont {
        let mut reasons = Vec::new();
        for source in &self.sources {
            match source.load() {
                FontProbe::Ready(font) => {
                    tracing::debug!(font = font.label(), px, "resolved font");
                    return ResolvedFont {
                        face: FontFace::Outline(font),
                        px,
                        warning: None,
                    };
                }
                FontProbe::Next(reason) => {
                    tracing::debug!(%reason, "font source unavailable");
                    reasons.push(reason);
                }
            }
        }

        let warning = if reasons.is_empty() {
            BUILTIN_FONT_WARNING.to_string()
        } else {
            format!("{BUILTIN_FONT_WARNING} ({})", reasons.join("; "))
        };
        ResolvedFont {
            warning: Some(warning),
            ..ResolvedFont::builtin(px)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
