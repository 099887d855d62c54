//! Streaming Detection Facade
//!
//! Unified re-exports for the detection domain.
//!
//! This facade provides a single entry point to all detection functionality:
//! - `StreamingStats`/`PointClassifier` traits and data models from SPI
//! - Configuration types from API
//! - `WindowStats` and `Classifier` implementations from Core

// Re-export everything from SPI
pub use detection_spi::*;

// Re-export everything from API
pub use detection_api::*;

// Re-export everything from Core
pub use detection_core::*;
