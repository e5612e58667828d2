/// Convenience result type used across noisemask.
pub type NoiseResult<T> = Result<T, NoiseError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Cancellation of a streaming session is not an error; it is reported through
/// [`SessionState`](crate::SessionState). Audio remux failures are recovered inside
/// [`AudioMuxer`](crate::AudioMuxer) and only surface as [`NoiseError::Mux`] when even the
/// silent fallback cannot be delivered.
#[derive(thiserror::Error, Debug)]
pub enum NoiseError {
    /// Invalid job parameters, buffer shapes or registry usage.
    #[error("validation error: {0}")]
    Validation(String),

    /// The decoding collaborator could not open the input video.
    #[error("source open error: {0}")]
    SourceOpen(String),

    /// Unexpected fault in the decode/detect/composite/write loop.
    #[error("render error: {0}")]
    Render(String),

    /// Audio post-processing could not produce any output file.
    #[error("mux error: {0}")]
    Mux(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NoiseError {
    /// Build a [`NoiseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NoiseError::SourceOpen`] value.
    pub fn source_open(msg: impl Into<String>) -> Self {
        Self::SourceOpen(msg.into())
    }

    /// Build a [`NoiseError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`NoiseError::Mux`] value.
    pub fn mux(msg: impl Into<String>) -> Self {
        Self::Mux(msg.into())
    }

    /// Return `true` for errors that mean the input could not be opened at all.
    pub fn is_source_open(&self) -> bool {
        matches!(self, Self::SourceOpen(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
