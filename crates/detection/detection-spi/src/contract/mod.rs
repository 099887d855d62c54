//! Contract definitions for streaming detection.
//!
//! This module contains trait definitions that providers must implement.

mod detector;

pub use detector::{PointClassifier, StreamingStats};
