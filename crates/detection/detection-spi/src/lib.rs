//! Streaming Detection Service Provider Interface
//!
//! Defines traits and types for sliding-window anomaly detection.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{PointClassifier, StreamingStats};
pub use error::{DetectError, Result};
pub use model::{AnomalyRecord, DataPoint, Verdict, WindowSnapshot};
