//! Threshold-based recommendations derived from simulation results.
//!
//! Pure functions over finished results; thresholds are tunable constants,
//! never per-request inputs. At most one recommendation of each type is
//! emitted per simulation.

use serde::{Deserialize, Serialize};

use ripple_core::FxHashSet;

use crate::failure::FailureResult;
use crate::scaling::{ScalingDirection, ScalingResult};

/// Traffic thresholds in RPS.
pub const TRAFFIC_CRITICAL_RPS: f64 = 100.0;
pub const TRAFFIC_HIGH_RPS: f64 = 50.0;
pub const TRAFFIC_MEDIUM_RPS: f64 = 10.0;

/// Latency-change magnitude thresholds in milliseconds.
pub const LATENCY_SIGNIFICANT_MS: f64 = 50.0;
pub const LATENCY_MODERATE_MS: f64 = 20.0;
pub const LATENCY_MINOR_MS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    DataQuality,
    CircuitBreaker,
    Redundancy,
    TopologyReview,
    GracefulDegradation,
    Monitoring,
    ScalingCaution,
    ScalingBenefit,
    CostEfficiency,
    PropagationAwareness,
    Proceed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub target: String,
    pub reason: String,
    pub action: String,
}

/// Rules for a failure simulation.
pub fn for_failure(result: &FailureResult) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let target = &result.target.service_id;

    if result.confidence.is_low() {
        recs.push(Recommendation {
            kind: RecommendationType::DataQuality,
            priority: Priority::High,
            target: target.clone(),
            reason: "the topology window is aging; impact figures may lag reality".to_string(),
            action: "refresh the graph source before acting on this simulation".to_string(),
        });
    }

    if result.total_lost_traffic_rps >= TRAFFIC_CRITICAL_RPS {
        recs.push(Recommendation {
            kind: RecommendationType::CircuitBreaker,
            priority: Priority::Critical,
            target: target.clone(),
            reason: format!(
                "a failure strands {:.1} RPS of upstream traffic",
                result.total_lost_traffic_rps
            ),
            action: format!("front {target} with a circuit breaker and fallback response"),
        });
    } else if let Some(caller) = result
        .affected_callers
        .iter()
        .find(|c| c.lost_traffic_rps >= TRAFFIC_HIGH_RPS)
    {
        recs.push(Recommendation {
            kind: RecommendationType::CircuitBreaker,
            priority: Priority::High,
            target: caller.service_id.clone(),
            reason: format!(
                "{} alone loses {:.1} RPS if {target} fails",
                caller.service_id, caller.lost_traffic_rps
            ),
            action: format!(
                "add a circuit breaker on {}'s calls to {target}",
                caller.service_id
            ),
        });
    }

    if result.affected_callers.len() >= 3 {
        recs.push(Recommendation {
            kind: RecommendationType::Redundancy,
            priority: Priority::High,
            target: target.clone(),
            reason: format!(
                "{} direct callers depend on a single instance group",
                result.affected_callers.len()
            ),
            action: format!("run {target} with redundant replicas across failure domains"),
        });
    }

    // Callers that appear on no enumerated path cannot be rerouted within
    // the analyzed depth.
    let on_some_path: FxHashSet<&str> = result
        .critical_paths_to_target
        .iter()
        .flat_map(|p| p.path.iter().map(String::as_str))
        .collect();
    let unreachable: Vec<_> = result
        .affected_callers
        .iter()
        .filter(|c| !on_some_path.contains(c.service_id.as_str()))
        .collect();
    let unreachable_loss: f64 = unreachable.iter().map(|c| c.lost_traffic_rps).sum();
    if unreachable.len() >= 2 || unreachable_loss >= TRAFFIC_MEDIUM_RPS {
        recs.push(Recommendation {
            kind: RecommendationType::TopologyReview,
            priority: Priority::Medium,
            target: target.clone(),
            reason: format!(
                "{} caller(s) with {:.1} RPS sit outside every analyzed path",
                unreachable.len(),
                unreachable_loss
            ),
            action: "review the topology for callers with no alternate route".to_string(),
        });
    }

    if result.total_lost_traffic_rps >= TRAFFIC_MEDIUM_RPS {
        recs.push(Recommendation {
            kind: RecommendationType::GracefulDegradation,
            priority: Priority::Medium,
            target: target.clone(),
            reason: format!(
                "downstream consumers lose {:.1} RPS of derived traffic",
                result.total_lost_traffic_rps
            ),
            action: format!("give {target}'s callers a degraded mode that tolerates its absence"),
        });
    }

    if recs.is_empty() {
        recs.push(Recommendation {
            kind: RecommendationType::Monitoring,
            priority: Priority::Low,
            target: target.clone(),
            reason: "simulated impact is below every action threshold".to_string(),
            action: format!("keep {target} under standard monitoring"),
        });
    }
    recs
}

/// Rules for a scaling simulation.
pub fn for_scaling(result: &ScalingResult) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let target = &result.target.service_id;
    let delta = result.latency_estimate.delta_ms;

    if result.confidence.is_low() {
        recs.push(Recommendation {
            kind: RecommendationType::DataQuality,
            priority: Priority::High,
            target: target.clone(),
            reason: "the topology window is aging; latency projections may lag reality"
                .to_string(),
            action: "refresh the graph source before acting on this simulation".to_string(),
        });
    }

    match (result.scaling_direction, delta) {
        (ScalingDirection::Down, Some(d)) if d >= LATENCY_SIGNIFICANT_MS => {
            recs.push(Recommendation {
                kind: RecommendationType::ScalingCaution,
                priority: Priority::High,
                target: target.clone(),
                reason: format!("scaling down degrades latency by a projected {d:.1} ms"),
                action: format!(
                    "stage the scale-down of {target} and watch caller latency between steps"
                ),
            });
        }
        (ScalingDirection::Up, Some(d)) if d <= -LATENCY_SIGNIFICANT_MS => {
            recs.push(Recommendation {
                kind: RecommendationType::ScalingBenefit,
                priority: Priority::Medium,
                target: target.clone(),
                reason: format!("scaling up improves latency by a projected {:.1} ms", d.abs()),
                action: format!("proceed with the scale-up of {target}"),
            });
        }
        (ScalingDirection::Up, Some(d)) if d.abs() < LATENCY_MINOR_MS => {
            recs.push(Recommendation {
                kind: RecommendationType::CostEfficiency,
                priority: Priority::Low,
                target: target.clone(),
                reason: format!(
                    "adding replicas changes latency by only {:.1} ms",
                    d.abs()
                ),
                action: format!(
                    "reconsider the scale-up of {target}; the extra capacity buys little latency"
                ),
            });
        }
        _ => {}
    }

    if result
        .affected_callers
        .items
        .iter()
        .any(|c| c.delta_ms.map(f64::abs).unwrap_or(0.0) >= LATENCY_MODERATE_MS)
    {
        recs.push(Recommendation {
            kind: RecommendationType::PropagationAwareness,
            priority: Priority::Medium,
            target: target.clone(),
            reason: "at least one upstream caller sees a moderate latency shift".to_string(),
            action: "notify owners of the affected callers before rolling out".to_string(),
        });
    }

    if recs.is_empty() {
        recs.push(Recommendation {
            kind: RecommendationType::Proceed,
            priority: Priority::Low,
            target: target.clone(),
            reason: "projected impact is below every caution threshold".to_string(),
            action: format!("proceed with the replica change for {target}"),
        });
    }
    recs
}
