//! The shared cache contract.
//!
//! Every cache type in this crate — [`crate::LruCache`], [`crate::LfuCache`],
//! [`crate::ArcCache`], [`crate::LruKCache`], [`crate::HashLruCache`],
//! [`crate::HashLfuCache`] — implements [`CachePolicy`]. Callers that only
//! care about the put/get contract, and want to swap policies without
//! touching call sites, should code against this trait.

/// Uniform put/get contract shared by every cache policy in this crate.
///
/// All methods take `&self`: each implementor is internally synchronized
/// (see the crate-level docs), so callers may invoke these concurrently
/// without any external locking.
pub trait CachePolicy<K, V> {
    /// Inserts or overwrites `key` with `value`.
    ///
    /// If `key` is already present, its value is overwritten and its
    /// position/frequency metadata is updated as though by a hit. Otherwise
    /// a new entry is inserted, evicting exactly one entry if the cache is
    /// at capacity. A no-op on a zero-capacity cache.
    fn put(&self, key: K, value: V);

    /// Looks up `key`, returning a clone of its value on a hit.
    ///
    /// This is the Rust rendering of an out-parameter lookup: `Some(value)`
    /// plays the role of "returned `true` and wrote through the out
    /// parameter", `None` plays the role of "returned `false`, out parameter
    /// untouched". A hit updates the entry's position/frequency metadata.
    fn try_get(&self, key: &K) -> Option<V>;

    /// Convenience by-value lookup: returns `V::default()` on a miss.
    ///
    /// Never fails. Prefer [`try_get`](Self::try_get) when the caller needs
    /// to distinguish "present with the default value" from "absent".
    fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.try_get(key).unwrap_or_default()
    }
}
