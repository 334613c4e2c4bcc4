//! Scaling simulator tests: the seed scenarios, null propagation, clamps,
//! and deterministic ordering.

use std::time::Duration;

use ripple_analysis::scaling::{self, ScalingDirection, ScalingRequest};
use ripple_analysis::snapshot::{build, GraphSnapshot};
use ripple_core::{
    DataFreshness, Deadline, LatencyMetric, MetricValue, NeighborhoodPayload, RawEdge,
    RippleConfig, ScalingModelKind, ServiceRef,
};

fn freshness() -> DataFreshness {
    DataFreshness {
        source: "graph-service".to_string(),
        stale: false,
        last_updated_seconds_ago: Some(30),
        window_minutes: Some(10),
    }
}

fn raw_edge(from: &str, to: &str, rate: f64, p95: Option<f64>) -> RawEdge {
    RawEdge {
        from: from.to_string(),
        to: to.to_string(),
        rate: Some(MetricValue::Scalar(rate)),
        error_rate: None,
        p50: None,
        p95: p95.map(MetricValue::Scalar),
        p99: None,
    }
}

fn snapshot(nodes: &[&str], edges: Vec<RawEdge>, target: &str) -> GraphSnapshot {
    let payload = NeighborhoodPayload {
        nodes: nodes.iter().map(|s| s.to_string()).collect(),
        edges,
    };
    build(&payload, &ServiceRef::parse(target), 2, freshness()).unwrap()
}

fn request(target: &str, current: u32, new: u32) -> ScalingRequest {
    ScalingRequest {
        target: ServiceRef::parse(target),
        current_pods: current,
        new_pods: new,
        latency_metric: None,
        model: None,
        alpha: None,
        max_depth: None,
    }
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

// Seed scenario: bounded_sqrt 2→6 pods, α = 0.5, one caller edge with
// rate 5.31 and p95 34.67 ms. r = 3, improvement = 1/√3, projected ≈ 27.34.
#[test]
fn bounded_sqrt_scale_up_scenario() {
    let snap = snapshot(
        &["loadgenerator", "checkout"],
        vec![raw_edge("loadgenerator", "checkout", 5.31, Some(34.67))],
        "checkout",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("checkout", 2, 6), &config, &deadline()).unwrap();

    let estimate = &result.latency_estimate;
    assert_eq!(estimate.baseline_ms, Some(34.67));
    let projected = estimate.projected_ms.unwrap();
    assert!((projected - 27.34).abs() < 0.01, "projected {projected}");
    // Not clamped: well above 34.67 · 0.6 = 20.80.
    assert!(projected > 34.67 * 0.6);
    assert_eq!(estimate.unit, "milliseconds");
    assert_eq!(result.scaling_direction, ScalingDirection::Up);
    assert_eq!(result.scaling_model, ScalingModelKind::BoundedSqrt);

    let caller = result
        .affected_callers
        .items
        .iter()
        .find(|c| c.service_id == "loadgenerator")
        .unwrap();
    assert_eq!(caller.before_ms, Some(34.67));
    let after = caller.after_ms.unwrap();
    assert!((after - 27.34).abs() < 0.01);
    let delta = caller.delta_ms.unwrap();
    assert!((delta + 7.33).abs() < 0.01, "delta {delta}");
    assert_eq!(caller.hop_distance, Some(1));
}

// Seed scenario: clamp. baseline 100 ms, 1→1000 pods, α = 0.5,
// min_latency_factor 0.6 → the formula's ≈51 ms clamps to 60.
#[test]
fn bounded_sqrt_clamps_to_min_latency_factor() {
    let snap = snapshot(
        &["caller", "svc"],
        vec![raw_edge("caller", "svc", 10.0, Some(100.0))],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 1, 1000), &config, &deadline()).unwrap();
    assert_eq!(result.latency_estimate.projected_ms, Some(60.0));
}

// Clamp law: projected ≥ baseline · min_latency_factor for any scale-up.
#[test]
fn bounded_sqrt_clamp_holds_across_ratios() {
    let config = RippleConfig::default();
    for new_pods in [2u32, 3, 5, 10, 50, 400] {
        let snap = snapshot(
            &["caller", "svc"],
            vec![raw_edge("caller", "svc", 1.0, Some(80.0))],
            "svc",
        );
        let result =
            scaling::run(&snap, &request("svc", 1, new_pods), &config, &deadline()).unwrap();
        let projected = result.latency_estimate.projected_ms.unwrap();
        assert!(
            projected >= 80.0 * 0.6 - 1e-9,
            "ratio {new_pods}: projected {projected}"
        );
    }
}

// Seed scenario: linear 2→4 halves the baseline; the caller's weighted
// mean over its single edge moves from 100 to 50.
#[test]
fn linear_model_scenario() {
    let snap = snapshot(
        &["caller", "svc"],
        vec![raw_edge("caller", "svc", 2.0, Some(100.0))],
        "svc",
    );
    let config = RippleConfig::default();
    let mut req = request("svc", 2, 4);
    req.model = Some(ScalingModelKind::Linear);
    let result = scaling::run(&snap, &req, &config, &deadline()).unwrap();

    assert_eq!(result.latency_estimate.baseline_ms, Some(100.0));
    assert_eq!(result.latency_estimate.projected_ms, Some(50.0));
    assert_eq!(result.latency_estimate.delta_ms, Some(-50.0));
    assert_eq!(result.scaling_model, ScalingModelKind::Linear);

    let caller = &result.affected_callers.items[0];
    assert_eq!(caller.before_ms, Some(100.0));
    assert_eq!(caller.after_ms, Some(50.0));
    assert_eq!(caller.delta_ms, Some(-50.0));
}

// Scaling identity: equal pod counts project the baseline exactly and
// zero every delta, even with heterogeneous incoming latencies.
#[test]
fn equal_pod_counts_are_an_identity() {
    let snap = snapshot(
        &["a", "b", "svc"],
        vec![
            raw_edge("a", "svc", 1.0, Some(10.0)),
            raw_edge("b", "svc", 3.0, Some(50.0)),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 4, 4), &config, &deadline()).unwrap();

    let estimate = &result.latency_estimate;
    assert_eq!(estimate.baseline_ms, estimate.projected_ms);
    assert_eq!(estimate.delta_ms, Some(0.0));
    assert_eq!(result.scaling_direction, ScalingDirection::None);
    for caller in &result.affected_callers.items {
        assert_eq!(caller.delta_ms, Some(0.0), "caller {}", caller.service_id);
        assert_eq!(caller.before_ms, caller.after_ms);
    }
    for path in &result.affected_paths {
        assert_eq!(path.delta_ms, Some(0.0));
    }
}

// Seed scenario: zero traffic. All incoming edges carry rate 0 → baseline
// null, every delta null, and the run still succeeds with empty warnings.
#[test]
fn zero_traffic_propagates_nulls() {
    let snap = snapshot(
        &["a", "b", "svc"],
        vec![
            raw_edge("a", "svc", 0.0, Some(10.0)),
            raw_edge("b", "svc", 0.0, Some(50.0)),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 2, 6), &config, &deadline()).unwrap();

    assert_eq!(result.latency_estimate.baseline_ms, None);
    assert_eq!(result.latency_estimate.projected_ms, None);
    assert_eq!(result.latency_estimate.delta_ms, None);
    for caller in &result.affected_callers.items {
        assert_eq!(caller.delta_ms, None);
        assert_eq!(caller.before_ms, None);
    }
    assert!(result.warnings.is_empty());
    assert!(result.explanation.contains("unknown"));
}

// Missing latency on a path edge: the path stays in the ranking by
// pathRps but reports null sums and incompleteData.
#[test]
fn incomplete_path_is_flagged_not_dropped() {
    let snap = snapshot(
        &["a", "b", "svc"],
        vec![
            raw_edge("a", "b", 9.0, None),
            raw_edge("b", "svc", 5.0, Some(30.0)),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 2, 4), &config, &deadline()).unwrap();

    let broken = result
        .affected_paths
        .iter()
        .find(|p| p.path == vec!["a", "b", "svc"])
        .unwrap();
    assert!(broken.incomplete_data);
    assert_eq!(broken.before_ms, None);
    assert_eq!(broken.after_ms, None);
    assert_eq!(broken.delta_ms, None);
    assert_eq!(broken.path_rps, 5.0);

    let whole = result
        .affected_paths
        .iter()
        .find(|p| p.path == vec!["b", "svc"])
        .unwrap();
    assert!(!whole.incomplete_data);
    assert!(whole.before_ms.is_some());

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("p95"));
}

#[test]
fn scale_down_reports_degradation() {
    let snap = snapshot(
        &["caller", "svc"],
        vec![raw_edge("caller", "svc", 4.0, Some(40.0))],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 6, 2), &config, &deadline()).unwrap();

    assert_eq!(result.scaling_direction, ScalingDirection::Down);
    let delta = result.latency_estimate.delta_ms.unwrap();
    assert!(delta > 0.0, "scale-down should raise latency, delta {delta}");
    assert!(result.explanation.contains("degrade"));
}

#[test]
fn callers_sort_by_absolute_delta_nulls_last() {
    // near (reads the target edge directly), far (only sees its own edge
    // to near, unadjusted → delta 0), blind (no latency data → null delta).
    let snap = snapshot(
        &["near", "far", "blind", "svc"],
        vec![
            raw_edge("near", "svc", 5.0, Some(60.0)),
            raw_edge("far", "near", 5.0, Some(8.0)),
            raw_edge("blind", "far", 2.0, None),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 1, 4), &config, &deadline()).unwrap();

    let order: Vec<&str> = result
        .affected_callers
        .items
        .iter()
        .map(|c| c.service_id.as_str())
        .collect();
    assert_eq!(order[0], "near");
    // "blind" has no latency on its only edge → null delta → last.
    assert_eq!(order.last(), Some(&"blind"));
    let blind = result.affected_callers.items.last().unwrap();
    assert_eq!(blind.delta_ms, None);
    assert_eq!(blind.hop_distance, Some(3));

    let near = &result.affected_callers.items[0];
    assert_eq!(near.before_ms, Some(60.0));
    assert_eq!(near.after_ms, Some(45.0));
    assert_eq!(near.delta_ms, Some(-15.0));
}

#[test]
fn end_to_end_enrichment_attaches_the_strongest_path() {
    let snap = snapshot(
        &["a", "b", "svc"],
        vec![
            raw_edge("a", "b", 9.0, Some(5.0)),
            raw_edge("b", "svc", 5.0, Some(30.0)),
            raw_edge("a", "svc", 2.0, Some(25.0)),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let result = scaling::run(&snap, &request("svc", 1, 4), &config, &deadline()).unwrap();

    let a = result
        .affected_callers
        .items
        .iter()
        .find(|c| c.service_id == "a")
        .unwrap();
    // a→b→svc has pathRps 5.0, beating a→svc at 2.0.
    assert_eq!(a.via_path.as_deref(), Some(&["a".to_string(), "b".to_string(), "svc".to_string()][..]));
    let before = a.end_to_end_before_ms.unwrap();
    assert!((before - 35.0).abs() < 1e-9);
    assert!(a.end_to_end_after_ms.unwrap() < before);
}

#[test]
fn repeated_runs_are_identical() {
    let snap = snapshot(
        &["a", "b", "svc"],
        vec![
            raw_edge("a", "svc", 3.0, Some(12.0)),
            raw_edge("b", "svc", 4.0, Some(24.0)),
            raw_edge("a", "b", 2.0, Some(6.0)),
        ],
        "svc",
    );
    let config = RippleConfig::default();
    let req = request("svc", 2, 5);
    let first = scaling::run(&snap, &req, &config, &deadline()).unwrap();
    let second = scaling::run(&snap, &req, &config, &deadline()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
