//! Freshness assertion captured from the upstream source at acquisition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFreshness {
    /// Logical name of the upstream source.
    pub source: String,
    pub stale: bool,
    pub last_updated_seconds_ago: Option<u64>,
    pub window_minutes: Option<u64>,
}

impl DataFreshness {
    /// Whether the window is old enough to degrade simulation confidence.
    ///
    /// Hard-stale snapshots never reach a simulation (the gate rejects
    /// them); this catches data older than half the aggregation window.
    pub fn near_stale(&self) -> bool {
        if self.stale {
            return true;
        }
        match (self.last_updated_seconds_ago, self.window_minutes) {
            (Some(age), Some(window)) => age > window * 60 / 2,
            _ => false,
        }
    }
}
