/// Convenience result type used across cropstack.
pub type SketchResult<T> = Result<T, SketchError>;

/// Top-level error taxonomy used by sketch APIs.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The drawing surface could not be created or read back.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem or stream failures (frame output, event input).
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build a [`SketchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SketchError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SketchError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`SketchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
