//! Hash collection aliases used across the workspace.

/// Fast hash map keyed by service identifiers and edge keys.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Fast hash set, same hasher as [`FxHashMap`].
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
