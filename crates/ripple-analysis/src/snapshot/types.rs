//! `GraphSnapshot` — immutable petgraph-backed view of one k-hop
//! neighborhood, with a service-id index for O(1) lookups.
//!
//! Snapshots never change after construction. Simulations that need
//! "what-if" latencies keep them in a side structure keyed by identifier;
//! nothing here is mutable.

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use ripple_core::{DataFreshness, EdgeMetrics, FxHashMap, NodeData};

/// A borrowed view of one directed caller→callee edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub metrics: &'a EdgeMetrics,
}

#[derive(Debug)]
pub struct GraphSnapshot {
    graph: DiGraph<NodeData, EdgeMetrics>,
    index: FxHashMap<String, NodeIndex>,
    target_key: String,
    freshness: DataFreshness,
    generated_at: DateTime<Utc>,
    depth_used: u32,
    name_collisions: Vec<String>,
}

impl GraphSnapshot {
    pub(crate) fn new(
        graph: DiGraph<NodeData, EdgeMetrics>,
        index: FxHashMap<String, NodeIndex>,
        target_key: String,
        freshness: DataFreshness,
        depth_used: u32,
        name_collisions: Vec<String>,
    ) -> Self {
        Self {
            graph,
            index,
            target_key,
            freshness,
            generated_at: Utc::now(),
            depth_used,
            name_collisions,
        }
    }

    /// Canonical identifier of the request target inside this snapshot.
    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    pub fn freshness(&self) -> &DataFreshness {
        &self.freshness
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn depth_used(&self) -> u32 {
        self.depth_used
    }

    /// Duplicate plain names seen in the upstream payload. Never merged;
    /// surfaced as result warnings.
    pub fn name_collisions(&self) -> &[String] {
        &self.name_collisions
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn node(&self, key: &str) -> Option<&NodeData> {
        self.index.get(key).map(|idx| &self.graph[*idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node identifiers in ascending order. Traversals start from this
    /// to keep enumeration deterministic.
    pub fn node_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.index.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Edges into `key`; empty for identifiers outside the snapshot.
    pub fn incoming(&self, key: &str) -> Vec<EdgeView<'_>> {
        self.directed(key, Direction::Incoming)
    }

    /// Edges out of `key`; empty for identifiers outside the snapshot.
    pub fn outgoing(&self, key: &str) -> Vec<EdgeView<'_>> {
        self.directed(key, Direction::Outgoing)
    }

    /// The deduplicated edge at `(source, target)`, if present.
    pub fn edge_between(&self, source: &str, target: &str) -> Option<EdgeView<'_>> {
        self.outgoing(source)
            .into_iter()
            .find(|edge| edge.target == target)
    }

    /// Every deduplicated edge in the snapshot.
    pub fn edges(&self) -> Vec<EdgeView<'_>> {
        self.graph
            .edge_references()
            .map(|edge| EdgeView {
                source: self.graph[edge.source()].service_id.as_str(),
                target: self.graph[edge.target()].service_id.as_str(),
                metrics: edge.weight(),
            })
            .collect()
    }

    fn directed(&self, key: &str, direction: Direction) -> Vec<EdgeView<'_>> {
        let Some(&idx) = self.index.get(key) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|edge| EdgeView {
                source: self.graph[edge.source()].service_id.as_str(),
                target: self.graph[edge.target()].service_id.as_str(),
                metrics: edge.weight(),
            })
            .collect()
    }
}
