//! Service identifier parsing and normalization.
//!
//! A logical identifier is either a plain name (`"checkout"`) or a
//! namespace-qualified `"payments:checkout"`. This module is the only place
//! that splits on `':'`; everything downstream works with the canonical
//! in-snapshot key.

use serde::{Deserialize, Serialize};

/// Namespace assumed when the upstream source omits one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A parsed service reference: plain name plus namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRef {
    pub name: String,
    pub namespace: String,
}

impl ServiceRef {
    /// Parse a raw identifier, splitting an optional `"ns:"` prefix.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((ns, name)) if !ns.is_empty() => Self {
                name: name.to_string(),
                namespace: ns.to_string(),
            },
            Some((_, name)) => Self {
                name: name.to_string(),
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
            None => Self {
                name: raw.to_string(),
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
        }
    }

    /// Build from explicit parts; the namespace defaults when absent.
    pub fn from_parts(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace
                .filter(|ns| !ns.is_empty())
                .unwrap_or(DEFAULT_NAMESPACE)
                .to_string(),
        }
    }

    /// The canonical in-snapshot key. The upstream source returns plain
    /// names, so the key is the plain name.
    pub fn key(&self) -> &str {
        &self.name
    }

    /// The fully qualified `"ns:name"` form.
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl std::fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_name() {
        let r = ServiceRef::parse("checkout");
        assert_eq!(r.name, "checkout");
        assert_eq!(r.namespace, DEFAULT_NAMESPACE);
        assert_eq!(r.key(), "checkout");
    }

    #[test]
    fn parse_qualified_name() {
        let r = ServiceRef::parse("payments:checkout");
        assert_eq!(r.name, "checkout");
        assert_eq!(r.namespace, "payments");
        assert_eq!(r.key(), "checkout");
        assert_eq!(r.qualified(), "payments:checkout");
    }

    #[test]
    fn parse_empty_namespace_falls_back_to_default() {
        let r = ServiceRef::parse(":checkout");
        assert_eq!(r.name, "checkout");
        assert_eq!(r.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn from_parts_defaults_namespace() {
        let r = ServiceRef::from_parts("frontend", None);
        assert_eq!(r.namespace, DEFAULT_NAMESPACE);
        let r = ServiceRef::from_parts("frontend", Some("web"));
        assert_eq!(r.namespace, "web");
    }
}
