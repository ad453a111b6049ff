use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Rgba8, validate_font_size},
        error::{TextBehindError, TextBehindResult},
    },
    removal::{BackgroundRemover, CommandRemover, CutoutFile},
    text::font::FontChain,
};

/// Overlay text used when none is configured.
pub const DEFAULT_TEXT: &str = "PARTIAL\nWORLD";

/// File name suggested for the processed download.
pub const DOWNLOAD_FILE_NAME: &str = "processed_image.png";

/// Where the cutout comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoverConfig {
    /// Run an external tool.
    Command(CommandRemover),
    /// Use a cutout image already on disk.
    Cutout(PathBuf),
}

impl RemoverConfig {
    pub fn build(&self) -> Box<dyn BackgroundRemover> {
        match self {
            Self::Command(cmd) => Box::new(cmd.clone()),
            Self::Cutout(path) => Box::new(CutoutFile::new(path)),
        }
    }
}

impl Default for RemoverConfig {
    fn default() -> Self {
        Self::Command(CommandRemover::default())
    }
}

/// JSON job description. Every field is optional; the CLI layers its flags on top.
///
/// ```json
/// {
///   "text": "PARTIAL\nWORLD",
///   "font_size": 120,
///   "color": "#ffffff",
///   "fonts": ["fonts/Anton-Regular.ttf"],
///   "remover": { "command": { "program": "rembg", "args": ["i"] } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub color: Option<Rgba8>,
    /// Font files tried before the system candidates.
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
    #[serde(default)]
    pub remover: Option<RemoverConfig>,
}

impl JobConfig {
    pub fn from_reader<R: Read>(reader: R) -> TextBehindResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| TextBehindError::validation(format!("parse job config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> TextBehindResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open job config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn validate(&self) -> TextBehindResult<()> {
        if let Some(px) = self.font_size {
            validate_font_size(px)?;
        }
        if let Some(RemoverConfig::Command(cmd)) = &self.remover
            && cmd.program.trim().is_empty()
        {
            return Err(TextBehindError::validation(
                "remover command program must be non-empty",
            ));
        }
        Ok(())
    }

    pub fn overlay_settings(&self) -> OverlaySettings {
        OverlaySettings {
            text: self.text.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            font_size: self.font_size,
            color: self.color.unwrap_or_default(),
        }
    }

    pub fn font_chain(&self) -> FontChain {
        FontChain::with_preferred(&self.fonts)
    }

    pub fn build_remover(&self) -> Box<dyn BackgroundRemover> {
        self.remover.clone().unwrap_or_default().build()
    }
}

/// Resolved overlay settings consumed by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySettings {
    pub text: String,
    /// `None` picks 15% of the image height.
    pub font_size: Option<u32>,
    pub color: Rgba8,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size: None,
            color: Rgba8::WHITE,
        }
    }
}

impl OverlaySettings {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_font_size(mut self, px: u32) -> Self {
        self.font_size = Some(px);
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
