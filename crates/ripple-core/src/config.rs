//! Service configuration, immutable after startup.
//!
//! Every option has a pinned default reachable through an `effective_*`
//! accessor; the upstream base URL is the one required value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::metrics::{LatencyMetric, ScalingModelKind};

/// Hard upper bound on traversal depth, independent of configuration.
pub const HARD_MAX_DEPTH: u32 = 3;

/// Hard upper bound on paths returned from a simulation.
pub const HARD_MAX_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RippleConfig {
    /// Base URL of the upstream graph service. Required at startup.
    pub upstream_base_url: String,
    /// Latency percentile used when a request does not pick one. Default: p95.
    pub default_latency_metric: Option<LatencyMetric>,
    /// Default traversal depth. Default: 2 (hard max 3).
    pub max_traversal_depth: Option<u32>,
    /// Default scaling model. Default: bounded_sqrt.
    pub scaling_model: Option<ScalingModelKind>,
    /// Default α for the bounded_sqrt model. Default: 0.5.
    pub scaling_alpha: Option<f64>,
    /// Floor for projected latency as a fraction of baseline. Default: 0.6.
    pub min_latency_factor: Option<f64>,
    /// Overall per-request deadline in ms. Default: 8000.
    pub request_timeout_ms: Option<u64>,
    /// Per-upstream-call timeout in ms. Default: 5000.
    pub upstream_timeout_ms: Option<u64>,
    /// Cap on paths returned. Default: 10 (also the hard max).
    pub max_paths_returned: Option<usize>,
    /// HTTP listen address. Default: "0.0.0.0:8080".
    pub listen_addr: Option<String>,
    /// Decision-log database path. Default: "ripple.db".
    pub decision_log_path: Option<String>,
}

impl RippleConfig {
    pub fn effective_latency_metric(&self) -> LatencyMetric {
        self.default_latency_metric.unwrap_or(LatencyMetric::P95)
    }

    pub fn effective_max_depth(&self) -> u32 {
        self.max_traversal_depth.unwrap_or(2).min(HARD_MAX_DEPTH)
    }

    pub fn effective_scaling_model(&self) -> ScalingModelKind {
        self.scaling_model.unwrap_or(ScalingModelKind::BoundedSqrt)
    }

    pub fn effective_scaling_alpha(&self) -> f64 {
        self.scaling_alpha.unwrap_or(0.5)
    }

    pub fn effective_min_latency_factor(&self) -> f64 {
        self.min_latency_factor.unwrap_or(0.6)
    }

    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(8_000))
    }

    pub fn effective_upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms.unwrap_or(5_000))
    }

    pub fn effective_max_paths(&self) -> usize {
        self.max_paths_returned.unwrap_or(HARD_MAX_PATHS).min(HARD_MAX_PATHS)
    }

    pub fn effective_listen_addr(&self) -> String {
        self.listen_addr
            .clone()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    pub fn effective_decision_log_path(&self) -> String {
        self.decision_log_path
            .clone()
            .unwrap_or_else(|| "ripple.db".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pinned_semantics() {
        let config = RippleConfig::default();
        assert_eq!(config.effective_latency_metric(), LatencyMetric::P95);
        assert_eq!(config.effective_max_depth(), 2);
        assert_eq!(config.effective_scaling_model(), ScalingModelKind::BoundedSqrt);
        assert_eq!(config.effective_scaling_alpha(), 0.5);
        assert_eq!(config.effective_min_latency_factor(), 0.6);
        assert_eq!(config.effective_request_timeout(), Duration::from_secs(8));
        assert_eq!(config.effective_upstream_timeout(), Duration::from_secs(5));
        assert_eq!(config.effective_max_paths(), 10);
    }

    #[test]
    fn depth_and_paths_respect_hard_caps() {
        let config = RippleConfig {
            max_traversal_depth: Some(9),
            max_paths_returned: Some(50),
            ..Default::default()
        };
        assert_eq!(config.effective_max_depth(), HARD_MAX_DEPTH);
        assert_eq!(config.effective_max_paths(), HARD_MAX_PATHS);
    }

    #[test]
    fn parses_from_toml_with_partial_fields() {
        let config: RippleConfig = toml::from_str(
            r#"
            upstream_base_url = "http://graph:9000"
            scaling_alpha = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream_base_url, "http://graph:9000");
        assert_eq!(config.effective_scaling_alpha(), 0.3);
        assert_eq!(config.effective_max_depth(), 2);
    }
}
