use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::atomic::{AtomicU64, Ordering},
};

use image::RgbaImage;

use crate::{
    assets::decode::load_image,
    foundation::error::{TextBehindError, TextBehindResult},
};

/// Strips the background from an image, returning the subject with transparency elsewhere.
pub trait BackgroundRemover {
    fn remove(&mut self, image: &RgbaImage) -> TextBehindResult<RgbaImage>;
}

impl<F> BackgroundRemover for F
where
    F: FnMut(&RgbaImage) -> TextBehindResult<RgbaImage>,
{
    fn remove(&mut self, image: &RgbaImage) -> TextBehindResult<RgbaImage> {
        self(image)
    }
}

/// Runs an external cutout tool as `<program> <args>... <input.png> <output.png>`.
///
/// The default is `rembg i`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommandRemover {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandRemover {
    fn default() -> Self {
        Self {
            program: "rembg".to_string(),
            args: vec!["i".to_string()],
        }
    }
}

impl CommandRemover {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl BackgroundRemover for CommandRemover {
    #[tracing::instrument(skip(self, image), fields(program = %self.program))]
    fn remove(&mut self, image: &RgbaImage) -> TextBehindResult<RgbaImage> {
        let scratch = ScratchDir::create()?;
        let in_path = scratch.path().join("input.png");
        let out_path = scratch.path().join("cutout.png");

        image.save(&in_path).map_err(|e| {
            TextBehindError::removal(format!("write '{}': {e}", in_path.display()))
        })?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&in_path)
            .arg(&out_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                TextBehindError::removal(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextBehindError::removal(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        load_image(&out_path).map_err(|e| {
            TextBehindError::removal(format!("read '{}' output: {e}", self.program))
        })
    }
}

/// A cutout computed ahead of time and stored on disk; the input image is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutoutFile {
    pub path: PathBuf,
}

impl CutoutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BackgroundRemover for CutoutFile {
    fn remove(&mut self, _image: &RgbaImage) -> TextBehindResult<RgbaImage> {
        load_image(&self.path).map_err(|e| {
            TextBehindError::removal(format!("load cutout '{}': {e}", self.path.display()))
        })
    }
}

/// Private temporary directory, removed on drop.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> TextBehindResult<Self> {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let path =
            std::env::temp_dir().join(format!("textbehind-{}-{n}", std::process::id()));
        std::fs::create_dir_all(&path).map_err(|e| {
            TextBehindError::removal(format!("create scratch dir '{}': {e}", path.display()))
        })?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
#[path = "../tests/unit/removal.rs"]
mod tests;
