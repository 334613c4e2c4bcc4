//! Snapshot acquisition: staleness gate, then fetch, then build.

use ripple_core::{DataFreshness, Deadline, GraphSource, ImpactError, ServiceRef};

use super::builder;
use super::types::GraphSnapshot;

/// Acquire a snapshot of the k-hop neighborhood around `target`.
///
/// The staleness gate runs before any fetch: simulations must not run on
/// stale graphs, so a stale health report fails the whole request without
/// touching the neighborhood endpoint.
pub async fn acquire(
    source: &dyn GraphSource,
    target: &ServiceRef,
    depth: u32,
    deadline: &Deadline,
) -> Result<GraphSnapshot, ImpactError> {
    let health = source.check_health(deadline).await?;
    if health.stale {
        return Err(ImpactError::StaleData {
            last_updated_seconds_ago: health.last_updated_seconds_ago,
        });
    }
    let freshness = DataFreshness::from(health);

    let payload = source.get_neighborhood(target.key(), depth, deadline).await?;
    if payload.nodes.is_empty() {
        return Err(ImpactError::ServiceNotFound {
            service: target.key().to_string(),
        });
    }

    builder::build(&payload, target, depth, freshness)
}
