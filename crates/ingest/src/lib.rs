//! # ingest
//!
//! The single-writer ingest pipeline: each inbound point is validated,
//! classified against the sliding window, persisted when anomalous, and
//! fanned out to the raw and anomaly streams.

mod error;
mod pipeline;

pub use error::{IngestError, Result};
pub use pipeline::{IngestPipeline, Ingested};
