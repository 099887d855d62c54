//! Fixed-capacity sliding window with incremental statistics.

use std::collections::VecDeque;

use detection_api::DetectorConfig;
use detection_spi::{DetectError, Result, StreamingStats, WindowSnapshot};

/// Sliding window over the last N values with O(1) mean and population
/// standard deviation.
///
/// Statistics are maintained incrementally as running sum and
/// sum-of-squares. Once per capacity-many observations both are recomputed
/// exactly from the buffered values, so floating-point drift cannot
/// accumulate across the stream's lifetime. Variance is clamped at zero.
#[derive(Debug, Clone)]
pub struct WindowStats {
    buffer: VecDeque<f64>,
    capacity: usize,
    sum: f64,
    sum_sq: f64,
    since_rebuild: usize,
}

impl WindowStats {
    /// Create a window holding up to `capacity` values (>= 2).
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(DetectError::invalid("window_size", "must be at least 2"));
        }
        Ok(Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
            sum_sq: 0.0,
            since_rebuild: 0,
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.window_size)
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no values have been observed yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Recompute sum and sum-of-squares exactly from the buffer.
    fn rebuild(&mut self) {
        self.sum = self.buffer.iter().sum();
        self.sum_sq = self.buffer.iter().map(|v| v * v).sum();
        self.since_rebuild = 0;
    }

    fn compute_snapshot(&self) -> WindowSnapshot {
        let n = self.buffer.len();
        if n == 0 {
            return WindowSnapshot::new(0.0, 0.0, 0);
        }
        let mean = self.sum / n as f64;
        if n < WindowSnapshot::MIN_SAMPLES {
            // Standard deviation undefined below two samples.
            return WindowSnapshot::new(mean, 0.0, n);
        }
        let variance = (self.sum_sq / n as f64 - mean * mean).max(0.0);
        WindowSnapshot::new(mean, variance.sqrt(), n)
    }
}

impl StreamingStats for WindowStats {
    fn observe(&mut self, value: f64) -> WindowSnapshot {
        if self.buffer.len() == self.capacity {
            if let Some(evicted) = self.buffer.pop_front() {
                self.sum -= evicted;
                self.sum_sq -= evicted * evicted;
            }
        }
        self.buffer.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;

        self.since_rebuild += 1;
        if self.since_rebuild >= self.capacity {
            self.rebuild();
        }

        self.compute_snapshot()
    }

    fn stats(&self) -> WindowSnapshot {
        self.compute_snapshot()
    }

    fn samples(&self) -> usize {
        self.buffer.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.since_rebuild = 0;
    }
}
