//! Result fragments shared by both simulators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ripple_core::DataFreshness;

use crate::snapshot::GraphSnapshot;

/// Coarse confidence band derived from source freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn from_freshness(freshness: &DataFreshness) -> Self {
        if freshness.near_stale() {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Self::Low)
    }
}

/// Size and provenance of the neighborhood a simulation ran against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodSummary {
    pub service_count: usize,
    pub edge_count: usize,
    pub depth_used: u32,
    pub generated_at: DateTime<Utc>,
}

impl NeighborhoodSummary {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self {
            service_count: snapshot.node_count(),
            edge_count: snapshot.edge_count(),
            depth_used: snapshot.depth_used(),
            generated_at: snapshot.generated_at(),
        }
    }
}
