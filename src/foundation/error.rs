/// Result alias used across the crate.
pub type PixelflowResult<T> = Result<T, PixelflowError>;

/// Failure taxonomy for generation, rendering and persistence.
#[derive(thiserror::Error, Debug)]
pub enum PixelflowError {
    /// The source image could not be loaded or decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// A required input (e.g. the artwork label) was missing before processing started.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The local key-value store could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// A value or state transition was rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// The compositor or its surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// Plain-data (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its original source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixelflowError {
    /// Build a [`PixelflowError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PixelflowError::EmptyInput`].
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`PixelflowError::Persistence`].
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`PixelflowError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixelflowError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PixelflowError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
