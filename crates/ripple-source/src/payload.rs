//! Wire DTOs for upstream responses.
//!
//! Only shapes that need massaging live here; `NeighborhoodPayload`,
//! `RawEdge`, and `CentralityScore` deserialize directly from the wire and
//! are defined in ripple-core next to the trait that returns them.

use serde::Deserialize;

use ripple_core::SourceHealth;

/// Upstream health body. Fields are defensive-optional: a partially
/// degraded source still answers with whatever it knows.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stale: Option<bool>,
    #[serde(default)]
    pub last_updated_seconds_ago: Option<u64>,
    #[serde(default)]
    pub window_minutes: Option<u64>,
}

impl HealthDto {
    pub(crate) fn into_health(self, source: &str) -> SourceHealth {
        SourceHealth {
            source: source.to_string(),
            status: self.status.unwrap_or_else(|| "unknown".to_string()),
            stale: self.stale.unwrap_or(false),
            last_updated_seconds_ago: self.last_updated_seconds_ago,
            window_minutes: self.window_minutes,
        }
    }
}

/// Upstream service-list body.
#[derive(Debug, Deserialize)]
pub(crate) struct ServicesDto {
    #[serde(default)]
    pub services: Vec<String>,
}
