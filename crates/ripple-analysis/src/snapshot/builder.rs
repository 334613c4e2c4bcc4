//! Snapshot construction: normalize identifiers, drop dangling edges,
//! dedup parallel edges, build adjacency.

use petgraph::graph::{DiGraph, NodeIndex};

use ripple_core::{
    DataFreshness, EdgeMetrics, FxHashMap, ImpactError, NeighborhoodPayload, NodeData, RawEdge,
    ServiceRef,
};

use super::types::GraphSnapshot;

/// Build an immutable snapshot from a raw neighborhood payload.
///
/// Node insertion is in ascending name order and edge insertion follows
/// first occurrence in the payload, so two builds of the same payload
/// produce identical graphs.
pub fn build(
    payload: &NeighborhoodPayload,
    target: &ServiceRef,
    depth: u32,
    freshness: DataFreshness,
) -> Result<GraphSnapshot, ImpactError> {
    let target_key = target.key().to_string();

    // Unique node names, tracking duplicates. A repeated plain name is a
    // cross-namespace collision: flag it, keep the first occurrence.
    let mut names: Vec<&str> = Vec::with_capacity(payload.nodes.len());
    let mut seen = ripple_core::FxHashSet::default();
    let mut collisions: Vec<String> = Vec::new();
    for name in &payload.nodes {
        if seen.insert(name.as_str()) {
            names.push(name.as_str());
        } else if !collisions.iter().any(|c| c == name) {
            collisions.push(name.clone());
        }
    }
    names.sort_unstable();

    if !seen.contains(target_key.as_str()) {
        return Err(ImpactError::ServiceNotFound {
            service: target_key,
        });
    }
    if !collisions.is_empty() {
        tracing::warn!(
            service = %target_key,
            duplicates = collisions.len(),
            "upstream payload contained duplicate service names"
        );
    }

    let mut graph: DiGraph<NodeData, EdgeMetrics> = DiGraph::new();
    let mut index: FxHashMap<String, NodeIndex> = FxHashMap::default();
    for name in &names {
        let idx = graph.add_node(NodeData::from_name(name));
        index.insert((*name).to_string(), idx);
    }

    // Dedup edges keyed (from, to), merging parallel observations. The
    // first-occurrence order is kept so adjacency is deterministic.
    let mut merged: Vec<(NodeIndex, NodeIndex, EdgeMetrics)> = Vec::new();
    let mut edge_slots: FxHashMap<(NodeIndex, NodeIndex), usize> = FxHashMap::default();
    for raw in &payload.edges {
        let (Some(&from), Some(&to)) = (index.get(&raw.from), index.get(&raw.to)) else {
            // Endpoint outside the returned node set: drop.
            continue;
        };
        let metrics = normalize_edge(raw);
        match edge_slots.get(&(from, to)) {
            Some(&slot) => {
                let combined = merged[slot].2.merge(&metrics);
                merged[slot].2 = combined;
            }
            None => {
                edge_slots.insert((from, to), merged.len());
                merged.push((from, to, metrics));
            }
        }
    }
    for (from, to, metrics) in merged {
        graph.add_edge(from, to, metrics);
    }

    Ok(GraphSnapshot::new(
        graph,
        index,
        target_key,
        freshness,
        depth,
        collisions,
    ))
}

/// Normalize one raw edge: missing rate/error coerce to 0, negatives
/// clamp to 0, latencies stay unknown when absent.
fn normalize_edge(raw: &RawEdge) -> EdgeMetrics {
    EdgeMetrics {
        rate: raw.rate.map(|v| v.reading().max(0.0)).unwrap_or(0.0),
        error_rate: raw.error_rate.map(|v| v.reading().max(0.0)).unwrap_or(0.0),
        p50: raw.p50.map(|v| v.reading().max(0.0)),
        p95: raw.p95.map(|v| v.reading().max(0.0)),
        p99: raw.p99.map(|v| v.reading().max(0.0)),
    }
}
