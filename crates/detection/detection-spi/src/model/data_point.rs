//! Raw metric data point.

use serde::{Deserialize, Serialize};

/// A single point of the inbound metric stream.
///
/// Immutable once created; the pipeline rebroadcasts accepted points
/// verbatim on the raw channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Observed metric value.
    pub value: f64,
    /// Event time in Unix seconds (fractional).
    pub timestamp: f64,
}

impl DataPoint {
    /// Create a new data point.
    pub fn new(value: f64, timestamp: f64) -> Self {
        Self { value, timestamp }
    }

    /// True when both fields are finite numbers.
    ///
    /// Non-finite points must be rejected before they reach the window.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.timestamp.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_point() {
        assert!(DataPoint::new(42.0, 1700000000.5).is_finite());
    }

    #[test]
    fn test_non_finite_value() {
        assert!(!DataPoint::new(f64::NAN, 1700000000.0).is_finite());
        assert!(!DataPoint::new(f64::INFINITY, 1700000000.0).is_finite());
        assert!(!DataPoint::new(f64::NEG_INFINITY, 1700000000.0).is_finite());
    }

    #[test]
    fn test_non_finite_timestamp() {
        assert!(!DataPoint::new(42.0, f64::NAN).is_finite());
        assert!(!DataPoint::new(42.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_serde_field_names() {
        let point = DataPoint::new(45.5, 1700000000.25);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"value\":45.5"));
        assert!(json.contains("\"timestamp\":1700000000.25"));

        let back: DataPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
