/// Convenience result type used across curvet.
pub type CurvetResult<T> = Result<T, CurvetError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CurvetError {
    /// Invalid user-provided or session configuration data (sample counts,
    /// durations, frame rates, dimensions). Rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The data-parallel compute executor could not be created. Fatal at
    /// compositor construction; aborts the whole render session.
    #[error("compute unavailable: {0}")]
    ComputeUnavailable(String),

    /// The external video writer rejected a push or failed to finalize.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CurvetError {
    /// Build a [`CurvetError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`CurvetError::ComputeUnavailable`] value.
    pub fn compute_unavailable(msg: impl Into<String>) -> Self {
        Self::ComputeUnavailable(msg.into())
    }

    /// Build a [`CurvetError::EncodingFailed`] value.
    pub fn encoding_failed(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
