//! Failure simulator: who loses traffic when the target disappears.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use ripple_core::{DataFreshness, Deadline, ImpactError, NodeData, ServiceRef};

use crate::paths::{self, CriticalPath};
use crate::recommend::Recommendation;
use crate::result::{Confidence, NeighborhoodSummary};
use crate::snapshot::GraphSnapshot;

#[derive(Debug, Clone)]
pub struct FailureRequest {
    pub target: ServiceRef,
    pub max_depth: Option<u32>,
}

/// One direct caller of the failed target and what it loses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedCaller {
    pub service_id: String,
    pub name: String,
    pub namespace: String,
    pub lost_traffic_rps: f64,
    pub edge_error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResult {
    pub target: NodeData,
    pub neighborhood: NeighborhoodSummary,
    pub data_freshness: DataFreshness,
    pub confidence: Confidence,
    pub affected_callers: Vec<AffectedCaller>,
    pub critical_paths_to_target: Vec<CriticalPath>,
    pub total_lost_traffic_rps: f64,
    pub explanation: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Pure simulation over an acquired snapshot. Recommendations are filled
/// by the engine after this returns.
pub fn run(
    snapshot: &GraphSnapshot,
    max_depth: u32,
    max_paths: usize,
    deadline: &Deadline,
) -> Result<FailureResult, ImpactError> {
    let target_key = snapshot.target_key();
    let target = snapshot
        .node(target_key)
        .cloned()
        .ok_or_else(|| ImpactError::ServiceNotFound {
            service: target_key.to_string(),
        })?;

    let mut affected_callers: Vec<AffectedCaller> = snapshot
        .incoming(target_key)
        .iter()
        .map(|edge| {
            let node = snapshot.node(edge.source);
            AffectedCaller {
                service_id: edge.source.to_string(),
                name: node.map(|n| n.name.clone()).unwrap_or_else(|| edge.source.to_string()),
                namespace: node
                    .map(|n| n.namespace.clone())
                    .unwrap_or_else(|| ripple_core::DEFAULT_NAMESPACE.to_string()),
                lost_traffic_rps: edge.metrics.rate,
                edge_error_rate: edge.metrics.error_rate,
            }
        })
        .collect();
    affected_callers.sort_by(|a, b| {
        b.lost_traffic_rps
            .partial_cmp(&a.lost_traffic_rps)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.service_id.cmp(&b.service_id))
    });

    let total_lost_traffic_rps: f64 = affected_callers.iter().map(|c| c.lost_traffic_rps).sum();
    let critical_paths_to_target = paths::find_top_paths(snapshot, max_depth, max_paths, deadline)?;

    let explanation = compose_explanation(
        target_key,
        affected_callers.len(),
        total_lost_traffic_rps,
        critical_paths_to_target.len(),
        max_depth,
    );

    let mut warnings = Vec::new();
    if !snapshot.name_collisions().is_empty() {
        warnings.push(format!(
            "upstream payload contained duplicate service names: {}",
            snapshot.name_collisions().join(", ")
        ));
    }

    Ok(FailureResult {
        target,
        neighborhood: NeighborhoodSummary::from_snapshot(snapshot),
        data_freshness: snapshot.freshness().clone(),
        confidence: Confidence::from_freshness(snapshot.freshness()),
        affected_callers,
        critical_paths_to_target,
        total_lost_traffic_rps,
        explanation,
        recommendations: Vec::new(),
        warnings,
    })
}

fn compose_explanation(
    target: &str,
    caller_count: usize,
    total_rps: f64,
    path_count: usize,
    depth: u32,
) -> String {
    if caller_count == 0 {
        return format!(
            "No services currently route traffic to {target}; its failure would strand no upstream callers."
        );
    }
    let caller_word = if caller_count == 1 { "caller" } else { "callers" };
    let path_word = if path_count == 1 { "path" } else { "paths" };
    format!(
        "If {target} fails, {caller_count} direct {caller_word} lose a combined {total_rps:.2} RPS \
         and {path_count} upstream {path_word} within {depth} hops would break."
    )
}
