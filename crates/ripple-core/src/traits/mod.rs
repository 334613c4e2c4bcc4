//! Engine-facing traits.
//!
//! The upstream graph service is consumed through [`GraphSource`] so the
//! simulation kernel can run against fakes in tests and so the transport
//! lives in its own crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::errors::ImpactError;
use crate::types::freshness::DataFreshness;
use crate::types::value::MetricValue;

/// Health/freshness report from the upstream graph service.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceHealth {
    /// Logical name of the source, used in freshness payloads.
    pub source: String,
    pub status: String,
    pub stale: bool,
    pub last_updated_seconds_ago: Option<u64>,
    pub window_minutes: Option<u64>,
}

impl From<SourceHealth> for DataFreshness {
    fn from(health: SourceHealth) -> Self {
        Self {
            source: health.source,
            stale: health.stale,
            last_updated_seconds_ago: health.last_updated_seconds_ago,
            window_minutes: health.window_minutes,
        }
    }
}

/// One observed edge as returned by the source, before normalization.
///
/// Numeric fields may arrive as scalars or `{low, high}` ranges; missing
/// rate/error fields coerce to 0 during snapshot construction while missing
/// latencies stay unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub rate: Option<MetricValue>,
    #[serde(default)]
    pub error_rate: Option<MetricValue>,
    #[serde(default)]
    pub p50: Option<MetricValue>,
    #[serde(default)]
    pub p95: Option<MetricValue>,
    #[serde(default)]
    pub p99: Option<MetricValue>,
}

/// Raw k-hop neighborhood payload: node names plus observed edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NeighborhoodPayload {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// Centrality scores for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralityScore {
    pub service: String,
    #[serde(default)]
    pub pagerank: f64,
    #[serde(default)]
    pub betweenness: f64,
}

/// The upstream graph service, as the kernel sees it.
///
/// Every call honors the request deadline on top of the client's own
/// per-call timeout. Implementations classify failures into the core
/// taxonomy; callers never retry.
#[async_trait]
pub trait GraphSource: Send + Sync {
    async fn check_health(&self, deadline: &Deadline) -> Result<SourceHealth, ImpactError>;

    async fn get_neighborhood(
        &self,
        service: &str,
        depth: u32,
        deadline: &Deadline,
    ) -> Result<NeighborhoodPayload, ImpactError>;

    async fn get_centrality_scores(
        &self,
        deadline: &Deadline,
    ) -> Result<Vec<CentralityScore>, ImpactError>;

    async fn list_services(&self, deadline: &Deadline) -> Result<Vec<String>, ImpactError>;
}
