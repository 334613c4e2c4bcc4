//! # ripple-analysis
//!
//! Simulation and graph-analysis kernel for Ripple: snapshot acquisition
//! with the staleness gate, deterministic bounded path enumeration, the
//! failure and scaling simulators, centrality-based risk ranking, and the
//! threshold recommendation engine.
//!
//! Everything below the engine facade is a pure function of a snapshot
//! plus inputs; only snapshot acquisition and the upstream calls suspend.

pub mod engine;
pub mod failure;
pub mod paths;
pub mod recommend;
pub mod result;
pub mod risk;
pub mod scaling;
pub mod snapshot;

pub use engine::ImpactEngine;
