//! # store
//!
//! Append-only durable log for detected anomalies.
//!
//! One `AnomalyRecord` per line as JSON, UTF-8, append-only. The format is
//! self-describing: any process can replay or tail the file without the
//! owning process running.

mod anomaly_log;
mod error;

pub use anomaly_log::{AnomalyLog, Tail};
pub use error::{Result, StoreError};
