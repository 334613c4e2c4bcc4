//! Upstream numeric fields that arrive either as a scalar or as
//! `{low, high}`. The tagged sum remembers its origin so re-serialization
//! preserves the shape; downstream code reads one number uniformly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Range { low: f64, high: f64 },
}

impl MetricValue {
    /// The numeric reading: scalars as-is, ranges by their high bound
    /// (worst observed, consistent with the latency max-merge).
    pub fn reading(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Range { high, .. } => *high,
        }
    }

    /// Whether the value arrived as a `{low, high}` object.
    pub fn was_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}
