//! Classification verdict.

use serde::{Deserialize, Serialize};

/// Binary classification outcome for one data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Normal,
    Anomalous,
}

impl Verdict {
    /// True for [`Verdict::Anomalous`].
    pub fn is_anomalous(&self) -> bool {
        matches!(self, Verdict::Anomalous)
    }
}
