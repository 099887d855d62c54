//! # broker
//!
//! Publish/subscribe fan-out for the raw-point and anomaly streams.
//!
//! Each stream is one [`Channel`]. Subscribing atomically snapshots the
//! backlog and attaches a live receiver, so an item published concurrently
//! with a subscribe lands exactly once: in the snapshot or as the first
//! live item, never both, never neither.

mod channel;

pub use channel::{Channel, Subscription, DEFAULT_LIVE_CAPACITY};
