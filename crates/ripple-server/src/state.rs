//! Shared per-process state handed to every handler.

use std::sync::Arc;

use ripple_analysis::ImpactEngine;
use ripple_storage::DecisionLog;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ImpactEngine>,
    pub decisions: Arc<DecisionLog>,
}
