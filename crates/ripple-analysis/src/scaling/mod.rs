//! Scaling simulator: how replica changes at the target shift the latency
//! every upstream caller and path observes.
//!
//! All latency arithmetic is null-aware: the moment an input is missing
//! the result is `None`, never a silent zero. Adjusted latencies live in a
//! side structure; the snapshot itself is never touched.

mod model;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use ripple_core::{
    DataFreshness, Deadline, ImpactError, LatencyMetric, NodeData, RippleConfig, ScalingModelKind,
    ServiceRef,
};

pub use model::LatencyModel;

use crate::paths::{self, CriticalPath};
use crate::recommend::Recommendation;
use crate::result::{Confidence, NeighborhoodSummary};
use crate::snapshot::{EdgeView, GraphSnapshot};

#[derive(Debug, Clone)]
pub struct ScalingRequest {
    pub target: ServiceRef,
    pub current_pods: u32,
    pub new_pods: u32,
    pub latency_metric: Option<LatencyMetric>,
    pub model: Option<ScalingModelKind>,
    pub alpha: Option<f64>,
    pub max_depth: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingDirection {
    Up,
    Down,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyEstimate {
    pub baseline_ms: Option<f64>,
    pub projected_ms: Option<f64>,
    pub delta_ms: Option<f64>,
    pub unit: String,
}

/// Latency change as seen by one upstream caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerImpact {
    pub service_id: String,
    pub name: String,
    pub namespace: String,
    pub hop_distance: Option<u32>,
    pub before_ms: Option<f64>,
    pub after_ms: Option<f64>,
    pub delta_ms: Option<f64>,
    pub end_to_end_before_ms: Option<f64>,
    pub end_to_end_after_ms: Option<f64>,
    pub end_to_end_delta_ms: Option<f64>,
    pub via_path: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedCallers {
    pub items: Vec<CallerImpact>,
}

/// One enumerated path with summed latency before and after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedPath {
    pub path: Vec<String>,
    pub path_rps: f64,
    pub before_ms: Option<f64>,
    pub after_ms: Option<f64>,
    pub delta_ms: Option<f64>,
    pub incomplete_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingResult {
    pub target: NodeData,
    pub neighborhood: NeighborhoodSummary,
    pub data_freshness: DataFreshness,
    pub confidence: Confidence,
    pub scaling_model: ScalingModelKind,
    pub current_pods: u32,
    pub new_pods: u32,
    pub latency_metric: LatencyMetric,
    pub latency_estimate: LatencyEstimate,
    pub scaling_direction: ScalingDirection,
    pub affected_callers: AffectedCallers,
    pub affected_paths: Vec<AffectedPath>,
    pub explanation: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Relative substitution applied to edges into the rescaled target.
///
/// Stored as a factor rather than an absolute value so that an unchanged
/// replica count leaves every caller's view byte-identical, even when the
/// target's incoming edges carry different latencies.
struct Adjustment {
    target_key: String,
    factor: f64,
}

/// Pure simulation over an acquired snapshot. Recommendations are filled
/// by the engine after this returns.
pub fn run(
    snapshot: &GraphSnapshot,
    request: &ScalingRequest,
    config: &RippleConfig,
    deadline: &Deadline,
) -> Result<ScalingResult, ImpactError> {
    let target_key = snapshot.target_key();
    let target = snapshot
        .node(target_key)
        .cloned()
        .ok_or_else(|| ImpactError::ServiceNotFound {
            service: target_key.to_string(),
        })?;

    let metric = request
        .latency_metric
        .unwrap_or_else(|| config.effective_latency_metric());
    let model = resolve_model(request, config);
    let max_paths = config.effective_max_paths();

    // Baseline: rate-weighted mean over the target's incoming edges.
    let incoming = snapshot.incoming(target_key);
    let baseline = weighted_mean(&incoming, metric, None);
    let projected = baseline.map(|b| model.project(b, request.current_pods, request.new_pods));
    let adjustment = match (baseline, projected) {
        (Some(b), Some(p)) => Some(Adjustment {
            target_key: target_key.to_string(),
            factor: if b > 0.0 { p / b } else { 1.0 },
        }),
        _ => None,
    };

    // Per-caller propagation over every non-target node.
    let mut items: Vec<CallerImpact> = Vec::new();
    for key in snapshot.node_keys() {
        if key == target_key {
            continue;
        }
        deadline.check("caller propagation")?;
        let outgoing = snapshot.outgoing(key);
        let before = weighted_mean(&outgoing, metric, None);
        let after = weighted_mean(&outgoing, metric, adjustment.as_ref());
        let delta = match (before, after) {
            (Some(b), Some(a)) => Some(a - b),
            _ => None,
        };
        let node = snapshot.node(key);
        items.push(CallerImpact {
            service_id: key.to_string(),
            name: node.map(|n| n.name.clone()).unwrap_or_else(|| key.to_string()),
            namespace: node
                .map(|n| n.namespace.clone())
                .unwrap_or_else(|| ripple_core::DEFAULT_NAMESPACE.to_string()),
            hop_distance: paths::hop_distance(snapshot, key, target_key, deadline)?,
            before_ms: before,
            after_ms: after,
            delta_ms: delta,
            end_to_end_before_ms: None,
            end_to_end_after_ms: None,
            end_to_end_delta_ms: None,
            via_path: None,
        });
    }

    // Affected paths with before/after sums.
    let depth = request.max_depth.unwrap_or_else(|| config.effective_max_depth());
    let critical = paths::find_top_paths(snapshot, depth, max_paths, deadline)?;
    let mut affected_paths: Vec<AffectedPath> = critical
        .into_iter()
        .map(|p| path_latency(snapshot, p, metric, adjustment.as_ref()))
        .collect();

    // End-to-end enrichment: each caller gets its strongest path. The
    // path list is still in path_rps order here, so the first match wins.
    for item in &mut items {
        if let Some(path) = affected_paths.iter().find(|p| p.path[0] == item.service_id) {
            item.end_to_end_before_ms = path.before_ms;
            item.end_to_end_after_ms = path.after_ms;
            item.end_to_end_delta_ms = path.delta_ms;
            item.via_path = Some(path.path.clone());
        }
    }

    sort_by_delta(&mut items, |i| i.delta_ms, |i| i.service_id.as_str());
    affected_paths.sort_by(|a, b| compare_delta(a.delta_ms, b.delta_ms));
    affected_paths.truncate(max_paths);

    let incomplete = affected_paths.iter().filter(|p| p.incomplete_data).count();
    let mut warnings = Vec::new();
    if incomplete > 0 {
        warnings.push(format!(
            "{incomplete} of {} analyzed paths lack {metric} data on at least one edge",
            affected_paths.len()
        ));
    }
    if !snapshot.name_collisions().is_empty() {
        warnings.push(format!(
            "upstream payload contained duplicate service names: {}",
            snapshot.name_collisions().join(", ")
        ));
    }

    let direction = if request.new_pods > request.current_pods {
        ScalingDirection::Up
    } else if request.new_pods < request.current_pods {
        ScalingDirection::Down
    } else {
        ScalingDirection::None
    };

    let delta = match (baseline, projected) {
        (Some(b), Some(p)) => Some(p - b),
        _ => None,
    };
    let explanation = compose_explanation(target_key, request, metric, baseline, projected, direction);

    Ok(ScalingResult {
        target,
        neighborhood: NeighborhoodSummary::from_snapshot(snapshot),
        data_freshness: snapshot.freshness().clone(),
        confidence: Confidence::from_freshness(snapshot.freshness()),
        scaling_model: model.kind(),
        current_pods: request.current_pods,
        new_pods: request.new_pods,
        latency_metric: metric,
        latency_estimate: LatencyEstimate {
            baseline_ms: baseline,
            projected_ms: projected,
            delta_ms: delta,
            unit: "milliseconds".to_string(),
        },
        scaling_direction: direction,
        affected_callers: AffectedCallers { items },
        affected_paths,
        explanation,
        recommendations: Vec::new(),
        warnings,
    })
}

fn resolve_model(request: &ScalingRequest, config: &RippleConfig) -> LatencyModel {
    let kind = request.model.unwrap_or_else(|| config.effective_scaling_model());
    match kind {
        ScalingModelKind::BoundedSqrt => LatencyModel::BoundedSqrt {
            alpha: request.alpha.unwrap_or_else(|| config.effective_scaling_alpha()),
            min_latency_factor: config.effective_min_latency_factor(),
        },
        ScalingModelKind::Linear => LatencyModel::Linear,
    }
}

/// Rate-weighted mean latency over a set of edges, with optional relative
/// substitution on edges into the adjusted node. Edges with `rate ≤ 0`
/// are ignored; a missing latency on any included edge makes the whole
/// mean unknown.
fn weighted_mean(
    edges: &[EdgeView<'_>],
    metric: LatencyMetric,
    adjustment: Option<&Adjustment>,
) -> Option<f64> {
    let mut rate_sum = 0.0;
    let mut acc = 0.0;
    for edge in edges {
        if edge.metrics.rate <= 0.0 {
            continue;
        }
        let latency = substituted_latency(edge, metric, adjustment)?;
        acc += edge.metrics.rate * latency;
        rate_sum += edge.metrics.rate;
    }
    if rate_sum > 0.0 {
        Some(acc / rate_sum)
    } else {
        None
    }
}

fn substituted_latency(
    edge: &EdgeView<'_>,
    metric: LatencyMetric,
    adjustment: Option<&Adjustment>,
) -> Option<f64> {
    let latency = edge.metrics.latency(metric)?;
    match adjustment {
        Some(adj) if edge.target == adj.target_key => Some(latency * adj.factor),
        _ => Some(latency),
    }
}

/// Sum a path's edge latencies before and after the change. The final
/// edge is the one into the target, so only it picks up the substitution.
fn path_latency(
    snapshot: &GraphSnapshot,
    critical: CriticalPath,
    metric: LatencyMetric,
    adjustment: Option<&Adjustment>,
) -> AffectedPath {
    let hops = critical.path.len().saturating_sub(1);
    let mut before_sum = 0.0;
    let mut after_sum = 0.0;
    let mut complete = hops > 0;

    for (i, pair) in critical.path.windows(2).enumerate() {
        let Some(edge) = snapshot.edge_between(&pair[0], &pair[1]) else {
            complete = false;
            break;
        };
        let Some(latency) = edge.metrics.latency(metric) else {
            complete = false;
            break;
        };
        before_sum += latency;
        let is_final = i == hops - 1;
        after_sum += match adjustment {
            Some(adj) if is_final => latency * adj.factor,
            _ => latency,
        };
    }

    if complete {
        AffectedPath {
            path: critical.path,
            path_rps: critical.path_rps,
            before_ms: Some(before_sum),
            after_ms: Some(after_sum),
            delta_ms: Some(after_sum - before_sum),
            incomplete_data: false,
        }
    } else {
        AffectedPath {
            path: critical.path,
            path_rps: critical.path_rps,
            before_ms: None,
            after_ms: None,
            delta_ms: None,
            incomplete_data: true,
        }
    }
}

/// |delta| descending, unknowns last.
fn compare_delta(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y
            .abs()
            .partial_cmp(&x.abs())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_by_delta<T>(
    items: &mut [T],
    delta: impl Fn(&T) -> Option<f64>,
    tie_key: impl Fn(&T) -> &str,
) {
    items.sort_by(|a, b| {
        compare_delta(delta(a), delta(b)).then_with(|| tie_key(a).cmp(tie_key(b)))
    });
}

fn compose_explanation(
    target: &str,
    request: &ScalingRequest,
    metric: LatencyMetric,
    baseline: Option<f64>,
    projected: Option<f64>,
    direction: ScalingDirection,
) -> String {
    let (Some(baseline), Some(projected)) = (baseline, projected) else {
        return format!(
            "Baseline {metric} latency for {target} is unknown (no positive-rate incoming \
             traffic with complete latency data); the latency projection is unavailable."
        );
    };
    match direction {
        ScalingDirection::None => format!(
            "Keeping {target} at {} replicas leaves the caller-observed {metric} latency at \
             {baseline:.2} ms.",
            request.current_pods
        ),
        _ => {
            let direction_word = match direction {
                ScalingDirection::Up => "up",
                _ => "down",
            };
            let delta = projected - baseline;
            let effect = if delta < 0.0 { "improve" } else { "degrade" };
            format!(
                "Scaling {target} {direction_word} from {} to {} replicas is projected to \
                 {effect} {metric} latency by {:.2} ms ({baseline:.2} ms to {projected:.2} ms).",
                request.current_pods,
                request.new_pods,
                delta.abs()
            )
        }
    }
}
