//! # ripple-core
//!
//! Foundation crate for the Ripple impact-analysis service.
//! Defines shared types, the error taxonomy, configuration, the graph-source
//! trait, and the request deadline token.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod deadline;
pub mod errors;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::RippleConfig;
pub use deadline::Deadline;
pub use errors::{ErrorCode, ImpactError};
pub use traits::{CentralityScore, GraphSource, NeighborhoodPayload, RawEdge, SourceHealth};
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::freshness::DataFreshness;
pub use types::identifiers::{ServiceRef, DEFAULT_NAMESPACE};
pub use types::metrics::{EdgeMetrics, LatencyMetric, ScalingModelKind};
pub use types::node::NodeData;
pub use types::value::MetricValue;
