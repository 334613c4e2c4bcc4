//! # ripple-source
//!
//! Typed reqwest client for the upstream graph service. Bounded per-call
//! timeouts, deadline capping, and classification of every failure into
//! the core error taxonomy. Log lines carry the logical endpoint, elapsed
//! ms, and the classified error, never credentials.

mod client;
mod endpoints;
mod payload;

pub use client::GraphSourceClient;
