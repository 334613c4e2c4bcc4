//! `ImpactEngine` — the facade the HTTP collaborator calls.
//!
//! Five operations: failure simulation, scaling simulation, risk ranking,
//! health, and the normalized service list. Each request gets its own
//! deadline; the engine holds no mutable state and is safe to share
//! across tasks.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use ripple_core::config::HARD_MAX_DEPTH;
use ripple_core::{
    DataFreshness, Deadline, GraphSource, ImpactError, LatencyMetric, NodeData, RippleConfig,
    ScalingModelKind, ServiceRef,
};

use crate::failure::{self, FailureRequest, FailureResult};
use crate::recommend;
use crate::risk::{self, RiskList, RiskMetric};
use crate::scaling::{self, ScalingRequest, ScalingResult};
use crate::snapshot;

pub struct ImpactEngine {
    source: Arc<dyn GraphSource>,
    config: Arc<RippleConfig>,
}

/// Health of the service itself: upstream freshness plus the pinned
/// simulation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub upstream: Option<DataFreshness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
    pub config: ConfigSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub default_latency_metric: LatencyMetric,
    pub max_traversal_depth: u32,
    pub scaling_model: ScalingModelKind,
    pub scaling_alpha: f64,
    pub min_latency_factor: f64,
    pub request_timeout_ms: u64,
    pub upstream_timeout_ms: u64,
    pub max_paths_returned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceList {
    pub services: Vec<NodeData>,
    pub count: usize,
    pub data_freshness: DataFreshness,
}

impl ImpactEngine {
    pub fn new(source: Arc<dyn GraphSource>, config: Arc<RippleConfig>) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.config.effective_request_timeout())
    }

    pub async fn simulate_failure(
        &self,
        request: &FailureRequest,
    ) -> Result<FailureResult, ImpactError> {
        let depth = request.max_depth.unwrap_or_else(|| self.config.effective_max_depth());
        validate_depth(depth)?;
        validate_target(&request.target)?;

        let deadline = self.deadline();
        let snapshot =
            snapshot::acquire(self.source.as_ref(), &request.target, depth, &deadline).await?;
        let mut result = failure::run(
            &snapshot,
            depth,
            self.config.effective_max_paths(),
            &deadline,
        )?;
        result.recommendations = recommend::for_failure(&result);
        tracing::info!(
            service = %request.target,
            affected_callers = result.affected_callers.len(),
            total_lost_rps = result.total_lost_traffic_rps,
            "failure simulation complete"
        );
        Ok(result)
    }

    pub async fn simulate_scaling(
        &self,
        request: &ScalingRequest,
    ) -> Result<ScalingResult, ImpactError> {
        let depth = request.max_depth.unwrap_or_else(|| self.config.effective_max_depth());
        validate_depth(depth)?;
        validate_target(&request.target)?;
        validate_pods(request.current_pods, request.new_pods)?;
        if let Some(alpha) = request.alpha {
            validate_alpha(alpha)?;
        }

        let deadline = self.deadline();
        let snapshot =
            snapshot::acquire(self.source.as_ref(), &request.target, depth, &deadline).await?;
        let mut result = scaling::run(&snapshot, request, &self.config, &deadline)?;
        result.recommendations = recommend::for_scaling(&result);
        tracing::info!(
            service = %request.target,
            current_pods = request.current_pods,
            new_pods = request.new_pods,
            baseline_ms = ?result.latency_estimate.baseline_ms,
            projected_ms = ?result.latency_estimate.projected_ms,
            "scaling simulation complete"
        );
        Ok(result)
    }

    pub async fn top_risk(
        &self,
        metric: RiskMetric,
        limit: usize,
    ) -> Result<RiskList, ImpactError> {
        if !(1..=20).contains(&limit) {
            return Err(ImpactError::validation(format!(
                "limit must be between 1 and 20, got {limit}"
            )));
        }
        let deadline = self.deadline();
        // Health and centrality are independent; fetch them concurrently.
        let (health, scores) = futures::try_join!(
            self.source.check_health(&deadline),
            self.source.get_centrality_scores(&deadline)
        )?;
        Ok(RiskList {
            metric,
            entries: risk::rank_services(scores, metric, limit),
            data_freshness: DataFreshness::from(health),
            generated_at: Utc::now(),
        })
    }

    /// Never fails: an unreachable upstream degrades the report instead.
    pub async fn health(&self) -> HealthReport {
        let deadline = self.deadline();
        let config = self.config_summary();
        match self.source.check_health(&deadline).await {
            Ok(health) => HealthReport {
                status: if health.stale { "degraded" } else { "ok" }.to_string(),
                upstream: Some(DataFreshness::from(health)),
                upstream_error: None,
                config,
            },
            Err(err) => HealthReport {
                status: "degraded".to_string(),
                upstream: None,
                upstream_error: Some(err.to_string()),
                config,
            },
        }
    }

    pub async fn services(&self) -> Result<ServiceList, ImpactError> {
        let deadline = self.deadline();
        let (health, names) = futures::try_join!(
            self.source.check_health(&deadline),
            self.source.list_services(&deadline)
        )?;
        let mut services: Vec<NodeData> = names
            .iter()
            .map(|name| NodeData::from(&ServiceRef::parse(name)))
            .collect();
        services.sort_by(|a, b| a.service_id.cmp(&b.service_id));
        services.dedup_by(|a, b| a.service_id == b.service_id);
        Ok(ServiceList {
            count: services.len(),
            services,
            data_freshness: DataFreshness::from(health),
        })
    }

    fn config_summary(&self) -> ConfigSummary {
        ConfigSummary {
            default_latency_metric: self.config.effective_latency_metric(),
            max_traversal_depth: self.config.effective_max_depth(),
            scaling_model: self.config.effective_scaling_model(),
            scaling_alpha: self.config.effective_scaling_alpha(),
            min_latency_factor: self.config.effective_min_latency_factor(),
            request_timeout_ms: self.config.effective_request_timeout().as_millis() as u64,
            upstream_timeout_ms: self.config.effective_upstream_timeout().as_millis() as u64,
            max_paths_returned: self.config.effective_max_paths(),
        }
    }
}

fn validate_depth(depth: u32) -> Result<(), ImpactError> {
    if !(1..=HARD_MAX_DEPTH).contains(&depth) {
        return Err(ImpactError::validation(format!(
            "maxDepth must be between 1 and {HARD_MAX_DEPTH}, got {depth}"
        )));
    }
    Ok(())
}

fn validate_target(target: &ServiceRef) -> Result<(), ImpactError> {
    if target.name.is_empty() {
        return Err(ImpactError::validation("service name must not be empty"));
    }
    Ok(())
}

fn validate_pods(current: u32, new: u32) -> Result<(), ImpactError> {
    if current == 0 || new == 0 {
        return Err(ImpactError::validation(
            "pod counts must be positive integers",
        ));
    }
    Ok(())
}

fn validate_alpha(alpha: f64) -> Result<(), ImpactError> {
    if !(0.0..=1.0).contains(&alpha) || !alpha.is_finite() {
        return Err(ImpactError::validation(format!(
            "alpha must be within [0, 1], got {alpha}"
        )));
    }
    Ok(())
}
