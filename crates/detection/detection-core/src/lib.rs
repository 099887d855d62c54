//! Streaming Detection Core
//!
//! Implementations of the sliding window and the threshold classifier.

mod classifier;
mod window;

pub use classifier::*;
pub use window::*;
