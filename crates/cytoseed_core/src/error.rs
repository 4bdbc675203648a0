//! Error types for cell assembly and lattice seeding.

use cytoseed_data::BodyId;
use thiserror::Error;

/// Main error type for cytoseed_core operations.
#[derive(Error, Debug)]
pub enum CellError {
    /// A bounding span is non-finite or not strictly increasing
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A noise deviation is negative or non-finite
    #[error("Invalid noise: {0}")]
    InvalidNoise(String),

    /// A factory, registry or spatial index call failed
    #[error("{collaborator} failed: {reason}")]
    CollaboratorFailure {
        collaborator: &'static str,
        reason: String,
    },

    /// A registered sphere could not be found again mid-assembly
    #[error("Partial construction of body {0}")]
    PartialConstruction(BodyId),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<CellError>,
    },
}

/// Result type alias for cytoseed_core operations.
pub type Result<T> = std::result::Result<T, CellError>;

impl CellError {
    #[must_use]
    pub fn geometry<S: Into<String>>(msg: S) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    #[must_use]
    pub fn noise<S: Into<String>>(msg: S) -> Self {
        Self::InvalidNoise(msg.into())
    }

    /// Creates a collaborator failure attributed to `collaborator`.
    #[must_use]
    pub fn collaborator<S: Into<String>>(collaborator: &'static str, reason: S) -> Self {
        Self::CollaboratorFailure {
            collaborator,
            reason: reason.into(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping context layers.
    #[must_use]
    pub fn root(&self) -> &CellError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CellError::collaborator("spatial index", "position out of bounds");
        assert_eq!(
            err.to_string(),
            "spatial index failed: position out of bounds"
        );
    }

    #[test]
    fn test_error_context() {
        let err = CellError::geometry("x span is empty").with_context("seeding 2d grid");
        assert!(err.to_string().contains("seeding 2d grid"));
        assert!(matches!(err.root(), CellError::InvalidGeometry(_)));
    }
}
