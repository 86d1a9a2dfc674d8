//! Error types for the radiation pass

use thiserror::Error;

/// Result type for radiation-force operations
pub type RadiationResult<T> = Result<T, RadiationError>;

/// Errors that can occur while estimating radiation force
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadiationError {
    /// Craft and light source coincide, or positions are not finite
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Settings that can never produce a valid capture (caught at construction)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The render collaborator could not produce a buffer
    #[error("Render failure: {0}")]
    RenderFailure(String),
}

impl RadiationError {
    /// Failures after which the caller should skip the tick and carry on
    pub fn is_transient(&self) -> bool {
        matches!(self, RadiationError::RenderFailure(_))
    }
}
