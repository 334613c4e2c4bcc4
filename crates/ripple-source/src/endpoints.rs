//! REST surface of the upstream graph service.
//!
//! Paths are relative to the configured base URL. The logical names are
//! what appears in log lines.

pub(crate) const HEALTH: &str = "api/health";
pub(crate) const SERVICES: &str = "api/services";
pub(crate) const NEIGHBORHOOD: &str = "api/graph/neighborhood";
pub(crate) const CENTRALITY: &str = "api/graph/centrality";
