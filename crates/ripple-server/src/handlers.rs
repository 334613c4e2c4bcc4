//! Request DTOs, boundary validation, and the six handlers.
//!
//! Validation here covers request *shape* (identifier xor, pod aliases,
//! required fields); range constraints are re-checked by the engine so the
//! kernel stays safe against other boundaries.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use ripple_analysis::engine::{HealthReport, ServiceList};
use ripple_analysis::failure::{FailureRequest, FailureResult};
use ripple_analysis::risk::{RiskList, RiskMetric};
use ripple_analysis::scaling::{ScalingRequest, ScalingResult};
use ripple_core::{ImpactError, LatencyMetric, ScalingModelKind, ServiceRef};
use ripple_storage::{DecisionKind, DecisionRecord, NewDecision};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRequestDto {
    pub service_id: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub max_depth: Option<u32>,
}

impl FailureRequestDto {
    fn into_request(self) -> Result<FailureRequest, ImpactError> {
        Ok(FailureRequest {
            target: resolve_target(self.service_id, self.name, self.namespace)?,
            max_depth: self.max_depth,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingModelDto {
    #[serde(rename = "type")]
    pub kind: Option<ScalingModelKind>,
    pub alpha: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingRequestDto {
    pub service_id: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub current_pods: Option<u32>,
    pub new_pods: Option<u32>,
    pub target_pods: Option<u32>,
    pub pods: Option<u32>,
    pub latency_metric: Option<LatencyMetric>,
    pub model: Option<ScalingModelDto>,
    pub max_depth: Option<u32>,
}

impl ScalingRequestDto {
    fn into_request(self) -> Result<ScalingRequest, ImpactError> {
        let target = resolve_target(self.service_id, self.name, self.namespace)?;
        let current_pods = self
            .current_pods
            .ok_or_else(|| ImpactError::validation("currentPods is required"))?;
        let new_pods = resolve_new_pods(self.new_pods, self.target_pods, self.pods)?;
        if current_pods == 0 || new_pods == 0 {
            return Err(ImpactError::validation(
                "pod counts must be positive integers",
            ));
        }
        let (model, alpha) = match self.model {
            Some(m) => (m.kind, m.alpha),
            None => (None, None),
        };
        Ok(ScalingRequest {
            target,
            current_pods,
            new_pods,
            latency_metric: self.latency_metric,
            model,
            alpha,
            max_depth: self.max_depth,
        })
    }
}

/// `serviceId` xor `name` (+ optional `namespace`).
fn resolve_target(
    service_id: Option<String>,
    name: Option<String>,
    namespace: Option<String>,
) -> Result<ServiceRef, ImpactError> {
    match (service_id, name) {
        (Some(_), Some(_)) => Err(ImpactError::validation(
            "provide either serviceId or name, not both",
        )),
        (Some(id), None) => {
            if namespace.is_some() {
                return Err(ImpactError::validation(
                    "namespace cannot accompany serviceId; use \"namespace:name\" or name+namespace",
                ));
            }
            if id.is_empty() {
                return Err(ImpactError::validation("serviceId must not be empty"));
            }
            Ok(ServiceRef::parse(&id))
        }
        (None, Some(name)) => {
            if name.is_empty() {
                return Err(ImpactError::validation("name must not be empty"));
            }
            Ok(ServiceRef::from_parts(&name, namespace.as_deref()))
        }
        (None, None) => Err(ImpactError::validation(
            "a service identifier is required (serviceId or name)",
        )),
    }
}

/// `newPods` / `targetPods` / `pods` are aliases; all supplied values must
/// agree and at least one must be present.
fn resolve_new_pods(
    new_pods: Option<u32>,
    target_pods: Option<u32>,
    pods: Option<u32>,
) -> Result<u32, ImpactError> {
    let supplied: Vec<u32> = [new_pods, target_pods, pods].into_iter().flatten().collect();
    match supplied.as_slice() {
        [] => Err(ImpactError::validation("newPods is required")),
        [first, rest @ ..] => {
            if rest.iter().any(|v| v != first) {
                return Err(ImpactError::validation(format!(
                    "conflicting pod counts: newPods={new_pods:?}, targetPods={target_pods:?}, pods={pods:?}"
                )));
            }
            Ok(*first)
        }
    }
}

pub async fn simulate_failure(
    State(state): State<AppState>,
    payload: Result<Json<FailureRequestDto>, JsonRejection>,
) -> Result<Json<FailureResult>, ApiError> {
    let Json(dto) = payload.map_err(bad_body)?;
    let request = dto.into_request()?;
    let result = state.engine.simulate_failure(&request).await?;
    record_decision(
        &state,
        DecisionKind::Failure,
        &result.target.service_id,
        confidence_label(result.confidence.is_low()),
        result.explanation.clone(),
        &result,
    );
    Ok(Json(result))
}

pub async fn simulate_scaling(
    State(state): State<AppState>,
    payload: Result<Json<ScalingRequestDto>, JsonRejection>,
) -> Result<Json<ScalingResult>, ApiError> {
    let Json(dto) = payload.map_err(bad_body)?;
    let request = dto.into_request()?;
    let result = state.engine.simulate_scaling(&request).await?;
    record_decision(
        &state,
        DecisionKind::Scaling,
        &result.target.service_id,
        confidence_label(result.confidence.is_low()),
        result.explanation.clone(),
        &result,
    );
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    pub metric: Option<RiskMetric>,
    pub limit: Option<usize>,
}

pub async fn top_risk(
    State(state): State<AppState>,
    Query(query): Query<RiskQuery>,
) -> Result<Json<RiskList>, ApiError> {
    let metric = query.metric.unwrap_or(RiskMetric::Pagerank);
    let limit = query.limit.unwrap_or(10);
    let list = state.engine.top_risk(metric, limit).await?;
    Ok(Json(list))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.engine.health().await)
}

pub async fn services(State(state): State<AppState>) -> Result<Json<ServiceList>, ApiError> {
    Ok(Json(state.engine.services().await?))
}

#[derive(Debug, Deserialize)]
pub struct DecisionsQuery {
    pub limit: Option<usize>,
}

pub async fn decisions(
    State(state): State<AppState>,
    Query(query): Query<DecisionsQuery>,
) -> Result<Json<Vec<DecisionRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(20).min(100);
    let log = Arc::clone(&state.decisions);
    let records = tokio::task::spawn_blocking(move || log.recent(limit))
        .await
        .map_err(|e| ImpactError::internal(format!("decision-log task failed: {e}")))?
        .map_err(|e| ImpactError::internal(format!("decision-log read failed: {e}")))?;
    Ok(Json(records))
}

/// Malformed bodies surface as the taxonomy's validation class (400),
/// not axum's default 422.
fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError(ImpactError::validation(rejection.body_text()))
}

fn confidence_label(low: bool) -> &'static str {
    if low {
        "low"
    } else {
        "high"
    }
}

/// Record a finished simulation. Failures to persist are logged, never
/// surfaced: the decision log is an audit trail, not a dependency.
fn record_decision<T: Serialize>(
    state: &AppState,
    kind: DecisionKind,
    target: &str,
    confidence: &'static str,
    summary: String,
    result: &T,
) {
    let result_json = match serde_json::to_value(result) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize simulation result for the decision log");
            return;
        }
    };
    let decision = NewDecision {
        kind,
        target: target.to_string(),
        confidence: confidence.to_string(),
        summary,
        result_json,
    };
    let log = Arc::clone(&state.decisions);
    tokio::task::spawn_blocking(move || {
        if let Err(err) = log.record(&decision) {
            tracing::warn!(error = %err, "failed to record decision");
        }
    });
}
