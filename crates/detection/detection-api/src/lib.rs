//! Streaming Detection API
//!
//! Configuration types and builders for the detection pipeline.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use detection_spi::{
    AnomalyRecord, DataPoint, DetectError, Result, Verdict, WindowSnapshot,
};

/// Detector configuration, fixed for the pipeline's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Number of recent values the sliding window holds (>= 2).
    pub window_size: usize,
    /// Multiplier of the standard deviation above the mean that flags a
    /// point (> 0).
    pub threshold_multiplier: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            threshold_multiplier: 2.0,
        }
    }
}

impl DetectorConfig {
    /// Create a validated configuration.
    pub fn new(window_size: usize, threshold_multiplier: f64) -> Result<Self> {
        let config = Self {
            window_size,
            threshold_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(DetectError::invalid("window_size", "must be at least 2"));
        }
        if !self.threshold_multiplier.is_finite() || self.threshold_multiplier <= 0.0 {
            return Err(DetectError::invalid(
                "threshold_multiplier",
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// Builder for [`DetectorConfig`].
#[derive(Debug, Default)]
pub struct DetectorConfigBuilder {
    window_size: Option<usize>,
    threshold_multiplier: Option<f64>,
}

impl DetectorConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Set the threshold multiplier.
    pub fn threshold_multiplier(mut self, multiplier: f64) -> Self {
        self.threshold_multiplier = Some(multiplier);
        self
    }

    /// Build the configuration, falling back to defaults for unset fields.
    pub fn build(self) -> Result<DetectorConfig> {
        let defaults = DetectorConfig::default();
        DetectorConfig::new(
            self.window_size.unwrap_or(defaults.window_size),
            self.threshold_multiplier
                .unwrap_or(defaults.threshold_multiplier),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.window_size, 20);
        assert_eq!(config.threshold_multiplier, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_valid() {
        let config = DetectorConfig::new(10, 1.5).unwrap();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.threshold_multiplier, 1.5);
    }

    #[test]
    fn test_window_size_too_small() {
        assert!(DetectorConfig::new(0, 2.0).is_err());
        assert!(DetectorConfig::new(1, 2.0).is_err());
        assert!(DetectorConfig::new(2, 2.0).is_ok());
    }

    #[test]
    fn test_multiplier_must_be_positive() {
        assert!(DetectorConfig::new(10, 0.0).is_err());
        assert!(DetectorConfig::new(10, -1.0).is_err());
        assert!(DetectorConfig::new(10, f64::NAN).is_err());
        assert!(DetectorConfig::new(10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = DetectorConfigBuilder::new().build().unwrap();
        assert_eq!(config.window_size, 20);
        assert_eq!(config.threshold_multiplier, 2.0);
    }

    #[test]
    fn test_builder_overrides() {
        let config = DetectorConfigBuilder::new()
            .window_size(3)
            .threshold_multiplier(1.5)
            .build()
            .unwrap();
        assert_eq!(config.window_size, 3);
        assert_eq!(config.threshold_multiplier, 1.5);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(DetectorConfigBuilder::new().window_size(1).build().is_err());
        assert!(DetectorConfigBuilder::new()
            .threshold_multiplier(-2.0)
            .build()
            .is_err());
    }
}
