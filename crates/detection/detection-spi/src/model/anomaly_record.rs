//! Persisted anomaly record.

use serde::{Deserialize, Serialize};

use super::{DataPoint, WindowSnapshot};

/// One detected anomaly, as written to the durable log and published on
/// the anomaly channel.
///
/// `timestamp` is always the original event time of the triggering data
/// point, never the time of detection or persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// The anomalous value.
    pub value: f64,
    /// Event time of the triggering point, Unix seconds.
    pub timestamp: f64,
    /// Window mean at classification time (post-insertion).
    pub mean: f64,
    /// Window population standard deviation at classification time.
    pub std_dev: f64,
}

impl AnomalyRecord {
    /// Build a record from the triggering point and the window snapshot it
    /// was classified against.
    pub fn from_observation(point: &DataPoint, snapshot: &WindowSnapshot) -> Self {
        Self {
            value: point.value,
            timestamp: point.timestamp,
            mean: snapshot.mean,
            std_dev: snapshot.std_dev,
        }
    }
}
