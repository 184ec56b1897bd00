/// Convenience result type used across the engine.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// No variant is fatal: every failure is local and recoverable by the caller
/// choosing a fallback value or skipping the frame's update. Stale evaluation
/// caches are not part of the taxonomy; they silently trigger a rebuild.
#[derive(thiserror::Error, Debug)]
pub enum LatticeError {
    /// Invalid user-provided or model data, including edits that would
    /// violate an entity invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A keyframe track with no keys was asked to evaluate.
    ///
    /// The owning property recovers by falling back to its static value.
    #[error("track has no keyframes")]
    NoKeyframes,

    /// The referenced path layer is missing, disabled, or its curve is
    /// degenerate.
    ///
    /// The caller recovers by leaving the layer transform unmodified.
    #[error("path unavailable: {0}")]
    PathUnavailable(String),

    /// A preset or query was given an empty frame range.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A frame rate with a zero numerator or denominator was supplied.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LatticeError {
    /// Build a [`LatticeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LatticeError::PathUnavailable`] value.
    pub fn path_unavailable(msg: impl Into<String>) -> Self {
        Self::PathUnavailable(msg.into())
    }

    /// Build a [`LatticeError::InvalidRange`] value.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build a [`LatticeError::InvalidFrameRate`] value.
    pub fn invalid_frame_rate(msg: impl Into<String>) -> Self {
        Self::InvalidFrameRate(msg.into())
    }

    /// Build a [`LatticeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
