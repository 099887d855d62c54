//! Detection error types.

use thiserror::Error;

/// Streaming detection errors.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl DetectError {
    /// Shorthand for an [`DetectError::InvalidParameter`].
    pub fn invalid(name: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let error = DetectError::InsufficientData {
            required: 2,
            got: 1,
        };
        assert_eq!(error.to_string(), "Insufficient data: required 2, got 1");
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = DetectError::invalid("window_size", "must be at least 2");
        assert_eq!(
            error.to_string(),
            "Invalid parameter: window_size - must be at least 2"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(DetectError::invalid("threshold_multiplier", "must be positive"));
        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn test_all_error_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DetectError>();
    }
}
