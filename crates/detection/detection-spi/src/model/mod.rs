//! Data models for streaming anomaly detection.
//!
//! This module contains data structures used throughout the detection system.

mod anomaly_record;
mod data_point;
mod verdict;
mod window_snapshot;

pub use anomaly_record::AnomalyRecord;
pub use data_point::DataPoint;
pub use verdict::Verdict;
pub use window_snapshot::WindowSnapshot;
