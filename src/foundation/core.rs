use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Smallest font size accepted from user input.
pub const MIN_FONT_SIZE: u32 = 10;
/// Largest font size accepted from user input.
pub const MAX_FONT_SIZE: u32 = 500;

/// Two-character escape that users type to request a line break.
pub const LINE_BREAK_ESCAPE: &str = "\\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Fill used for the drop shadow behind every text line.
    pub const SHADOW: Self = Self::new(0, 0, 0, 180);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn parse_hex(s: &str) -> TextBehindResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TextBehindError::validation(format!(
                "invalid color '{s}' (expected #rrggbb or #rrggbbaa)"
            )));
        }

        let channel = |i: usize| -> TextBehindResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| TextBehindError::validation(format!("invalid color '{s}': {e}")))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = TextBehindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}

/// Default font size for an image: 15% of its height, kept inside the accepted range.
pub fn default_font_size(image_height: u32) -> u32 {
    let px = (f64::from(image_height) * 0.15) as u32;
    px.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

pub fn validate_font_size(px: u32) -> TextBehindResult<u32> {
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&px) {
        return Err(TextBehindError::validation(format!(
            "font size {px} is outside [{MIN_FONT_SIZE}, {MAX_FONT_SIZE}]"
        )));
    }
    Ok(px)
}

/// Split user text into lines. Both real line feeds and the literal `\n` escape break lines;
/// empty input yields one empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace(LINE_BREAK_ESCAPE, "\n")
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
