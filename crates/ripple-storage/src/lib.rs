//! # ripple-storage
//!
//! The decision log: every simulation an operator runs is recorded with
//! its target, headline figures, and full result payload, so production
//! changes can be traced back to the analysis that justified them.
//!
//! Simulation results are never read back into the kernel. This crate is
//! an audit trail, not a cache.

mod error;
mod log;
mod schema;

pub use error::StorageError;
pub use log::{DecisionKind, DecisionLog, DecisionRecord, NewDecision};
