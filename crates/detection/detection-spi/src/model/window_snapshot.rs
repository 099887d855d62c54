//! Post-insertion window statistics.

use serde::{Deserialize, Serialize};

/// Statistics of the sliding window immediately after a value was admitted.
///
/// A snapshot with fewer than two samples is "cold": its standard deviation
/// is undefined and reported as 0.0, and classifiers must not flag against
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    /// Mean of the windowed values.
    pub mean: f64,
    /// Population standard deviation of the windowed values.
    pub std_dev: f64,
    /// Number of values currently in the window.
    pub samples: usize,
}

impl WindowSnapshot {
    /// Create a new snapshot.
    pub fn new(mean: f64, std_dev: f64, samples: usize) -> Self {
        Self {
            mean,
            std_dev,
            samples,
        }
    }

    /// Minimum sample count before standard deviation is defined.
    pub const MIN_SAMPLES: usize = 2;

    /// True once the window holds enough samples to classify against.
    pub fn is_warm(&self) -> bool {
        self.samples >= Self::MIN_SAMPLES
    }
}
