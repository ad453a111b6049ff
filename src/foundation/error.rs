/// Convenience result type used across textbehind.
pub type TextBehindResult<T> = Result<T, TextBehindError>;

/// Top-level error taxonomy returned by the processing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TextBehindError {
    /// Invalid user-provided settings or mismatched inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable or empty image input.
    #[error("decode error: {0}")]
    Decode(String),

    /// The background-removal collaborator failed.
    #[error("background removal error: {0}")]
    Removal(String),

    /// A font source produced unusable data.
    #[error("font error: {0}")]
    Font(String),

    /// Errors when encoding the final image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stable, copyable classification of a [`TextBehindError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Decode,
    Removal,
    Font,
    Encode,
    Other,
}

impl TextBehindError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn removal(msg: impl Into<String>) -> Self {
        Self::Removal(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Removal(_) => ErrorKind::Removal,
            Self::Font(_) => ErrorKind::Font,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
