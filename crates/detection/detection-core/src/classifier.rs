//! Mean + k·stddev threshold classifier.

use detection_api::DetectorConfig;
use detection_spi::{DetectError, PointClassifier, Result, Verdict, WindowSnapshot};

/// Upper-threshold classifier: a point is anomalous iff it exceeds
/// `mean + multiplier * std_dev`.
///
/// Only the upper side is checked; the domain models spike-style
/// anomalies. A cold snapshot (fewer than two samples) always classifies
/// as [`Verdict::Normal`].
#[derive(Debug, Clone)]
pub struct Classifier {
    multiplier: f64,
}

impl Classifier {
    /// Create a classifier with the given threshold multiplier (> 0).
    pub fn new(multiplier: f64) -> Result<Self> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(DetectError::invalid(
                "threshold_multiplier",
                "must be a positive finite number",
            ));
        }
        Ok(Self { multiplier })
    }

    /// Create from configuration.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::new(config.threshold_multiplier)
    }

    /// The configured multiplier.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl PointClassifier for Classifier {
    fn classify(&self, value: f64, snapshot: &WindowSnapshot) -> Verdict {
        if !snapshot.is_warm() {
            return Verdict::Normal;
        }
        if value > snapshot.mean + self.multiplier * snapshot.std_dev {
            Verdict::Anomalous
        } else {
            Verdict::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_validation() {
        assert!(Classifier::new(0.0).is_err());
        assert!(Classifier::new(-1.0).is_err());
        assert!(Classifier::new(f64::NAN).is_err());
        assert!(Classifier::new(2.0).is_ok());
    }

    #[test]
    fn test_cold_snapshot_never_flags() {
        let classifier = Classifier::new(2.0).unwrap();
        let cold = WindowSnapshot::new(0.0, 0.0, 1);
        assert_eq!(classifier.classify(1.0e12, &cold), Verdict::Normal);

        let empty = WindowSnapshot::new(0.0, 0.0, 0);
        assert_eq!(classifier.classify(f64::MAX, &empty), Verdict::Normal);
    }

    #[test]
    fn test_above_threshold_flags() {
        let classifier = Classifier::new(2.0).unwrap();
        let snap = WindowSnapshot::new(10.0, 1.0, 10);
        assert_eq!(classifier.classify(12.5, &snap), Verdict::Anomalous);
    }

    #[test]
    fn test_at_threshold_is_normal() {
        // Strictly greater than, not greater-or-equal.
        let classifier = Classifier::new(2.0).unwrap();
        let snap = WindowSnapshot::new(10.0, 1.0, 10);
        assert_eq!(classifier.classify(12.0, &snap), Verdict::Normal);
    }

    #[test]
    fn test_below_mean_is_normal() {
        // Asymmetric: drops are never flagged.
        let classifier = Classifier::new(2.0).unwrap();
        let snap = WindowSnapshot::new(10.0, 1.0, 10);
        assert_eq!(classifier.classify(-500.0, &snap), Verdict::Normal);
    }

    #[test]
    fn test_zero_std_dev_boundary() {
        // With std_dev 0 and any positive multiplier, any value above the
        // mean flags.
        let classifier = Classifier::new(2.0).unwrap();
        let snap = WindowSnapshot::new(10.0, 0.0, 4);

        assert_eq!(classifier.classify(10.0, &snap), Verdict::Normal);
        assert_eq!(classifier.classify(10.0001, &snap), Verdict::Anomalous);
        assert_eq!(classifier.classify(40.0, &snap), Verdict::Anomalous);
    }
}
