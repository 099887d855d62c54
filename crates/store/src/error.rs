//! Anomaly log error types.

use thiserror::Error;

/// Anomaly log errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Log file could not be opened or prepared
    #[error("Failed to open anomaly log: {0}")]
    Open(#[source] std::io::Error),

    /// Append did not reach the disk; the record was dropped from storage
    #[error("Append failed: {0}")]
    Append(#[source] std::io::Error),

    /// Log file could not be read
    #[error("Read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Record could not be serialized
    #[error("Encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type for anomaly log operations.
pub type Result<T> = std::result::Result<T, StoreError>;
