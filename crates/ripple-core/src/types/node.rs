//! Service node data as held inside a snapshot.

use serde::{Deserialize, Serialize};

use super::identifiers::{ServiceRef, DEFAULT_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub service_id: String,
    pub name: String,
    pub namespace: String,
}

impl NodeData {
    /// Node built from a plain upstream name; the namespace defaults.
    pub fn from_name(name: &str) -> Self {
        Self {
            service_id: name.to_string(),
            name: name.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl From<&ServiceRef> for NodeData {
    fn from(r: &ServiceRef) -> Self {
        Self {
            service_id: r.key().to_string(),
            name: r.name.clone(),
            namespace: r.namespace.clone(),
        }
    }
}
