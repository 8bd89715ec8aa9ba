/// Convenience result type used across Transmix.
pub type TransmixResult<T> = Result<T, TransmixError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TransmixError {
    /// Invalid user-provided or instruction data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransmixError {
    /// Build a [`TransmixError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TransmixError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Terminal failure reported to the host for a single composition request.
///
/// These are per-request outcomes, never fatal to the engine: the render
/// lane keeps processing subsequent requests regardless of any individual
/// request's result. No retries are attempted internally and no partial
/// frames are ever delivered.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeError {
    /// A required track buffer was unavailable: the sole foreground in a
    /// non-ignoring passthrough, or both foreground and background in a
    /// blend.
    #[error("a required source buffer was unavailable")]
    MissingSourceBuffer,

    /// The render context could not provide a destination buffer.
    #[error("the render context could not provide a destination buffer")]
    AllocationFailure,

    /// The effect submission produced no output image.
    #[error("the effect submission produced no output image")]
    RenderFailure,

    /// The request was still queued when a cancellation window was active.
    #[error("the request was cancelled while queued")]
    Cancelled,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
