//! Deterministic bounded path enumeration and BFS hop distance.
//!
//! Enumeration order is fully pinned: start nodes ascend by identifier,
//! outgoing edges explore by (rate desc, target asc), and the final
//! ranking is a stable sort on bottleneck RPS. Tests rely on this.

use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use ripple_core::{Deadline, FxHashSet, ImpactError};

use crate::snapshot::{EdgeView, GraphSnapshot};

/// One upstream path ending at the target, ranked by its bottleneck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPath {
    pub path: Vec<String>,
    pub path_rps: f64,
}

/// Enumerate upstream paths to the snapshot target.
///
/// A path is `v₀ … vₕ = target` with `h ∈ [1, max_hops]` edges and no
/// repeated node. Enumeration stops once `2·max_paths` candidates exist;
/// the final ordering is `path_rps` descending, truncated to `max_paths`.
pub fn find_top_paths(
    snapshot: &GraphSnapshot,
    max_hops: u32,
    max_paths: usize,
    deadline: &Deadline,
) -> Result<Vec<CriticalPath>, ImpactError> {
    let target = snapshot.target_key();
    let budget = max_paths.saturating_mul(2);
    let mut candidates: Vec<CriticalPath> = Vec::new();

    for start in snapshot.node_keys() {
        if start == target {
            continue;
        }
        if candidates.len() >= budget {
            break;
        }
        let mut path = vec![start.to_string()];
        let mut on_path = FxHashSet::default();
        on_path.insert(start.to_string());
        explore(
            snapshot,
            start,
            target,
            max_hops as usize,
            f64::INFINITY,
            &mut path,
            &mut on_path,
            budget,
            &mut candidates,
            deadline,
        )?;
    }

    candidates.sort_by(|a, b| {
        b.path_rps
            .partial_cmp(&a.path_rps)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(max_paths);
    Ok(candidates)
}

/// Depth-first expansion from `node`. `path` holds the nodes walked so
/// far (including `node`); reaching the target emits a candidate instead
/// of recursing, so the target never appears mid-path.
#[allow(clippy::too_many_arguments)]
fn explore(
    snapshot: &GraphSnapshot,
    node: &str,
    target: &str,
    max_hops: usize,
    min_rate: f64,
    path: &mut Vec<String>,
    on_path: &mut FxHashSet<String>,
    budget: usize,
    out: &mut Vec<CriticalPath>,
    deadline: &Deadline,
) -> Result<(), ImpactError> {
    deadline.check("path enumeration")?;

    let mut edges = snapshot.outgoing(node);
    sort_for_exploration(&mut edges);

    for edge in edges {
        if out.len() >= budget {
            return Ok(());
        }
        let bottleneck = min_rate.min(edge.metrics.rate);
        if edge.target == target {
            let mut found = path.clone();
            found.push(target.to_string());
            out.push(CriticalPath {
                path: found,
                path_rps: bottleneck,
            });
            continue;
        }
        // path.len() nodes mean path.len()-1 edges used; one more hop to a
        // non-target node only pays off if a terminal edge can still fit.
        if path.len() >= max_hops {
            continue;
        }
        if on_path.contains(edge.target) {
            continue;
        }
        path.push(edge.target.to_string());
        on_path.insert(edge.target.to_string());
        explore(
            snapshot,
            edge.target,
            target,
            max_hops,
            bottleneck,
            path,
            on_path,
            budget,
            out,
            deadline,
        )?;
        let popped = path.pop();
        if let Some(name) = popped {
            on_path.remove(&name);
        }
    }
    Ok(())
}

/// Exploration order: rate descending, then target ascending.
fn sort_for_exploration(edges: &mut [EdgeView<'_>]) {
    edges.sort_by(|a, b| {
        b.metrics
            .rate
            .partial_cmp(&a.metrics.rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.target.cmp(b.target))
    });
}

/// BFS hop distance from `from` to `to` over outgoing edges.
///
/// Returns `None` when `to` is unreachable. Polls the deadline on every
/// dequeue so a pathological snapshot cannot outlive the request.
pub fn hop_distance(
    snapshot: &GraphSnapshot,
    from: &str,
    to: &str,
    deadline: &Deadline,
) -> Result<Option<u32>, ImpactError> {
    if from == to {
        return Ok(Some(0));
    }
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();
    visited.insert(from);
    queue.push_back((from, 0));

    while let Some((node, depth)) = queue.pop_front() {
        deadline.check("hop distance")?;
        for edge in snapshot.outgoing(node) {
            if edge.target == to {
                return Ok(Some(depth + 1));
            }
            if visited.insert(edge.target) {
                queue.push_back((edge.target, depth + 1));
            }
        }
    }
    Ok(None)
}
