//! Route table.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::middleware::correlation;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/simulate/failure", post(handlers::simulate_failure))
        .route("/api/v1/simulate/scaling", post(handlers::simulate_scaling))
        .route("/api/v1/risk/top", get(handlers::top_risk))
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/services", get(handlers::services))
        .route("/api/v1/decisions", get(handlers::decisions))
        .layer(axum::middleware::from_fn(correlation))
        .with_state(state)
}
