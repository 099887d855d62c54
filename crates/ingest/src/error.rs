//! Ingest error types.

use thiserror::Error;

/// Ingest pipeline errors.
///
/// Persistence failures are deliberately not an error variant: the
/// pipeline degrades to live-only delivery and reports them through
/// [`crate::Ingested::persisted`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// Point rejected before reaching the window
    #[error("Validation error: {reason}")]
    Validation { reason: String },
}

impl IngestError {
    /// Shorthand for a [`IngestError::Validation`].
    pub fn validation(reason: &str) -> Self {
        Self::Validation {
            reason: reason.to_string(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
