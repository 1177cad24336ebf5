//! Unified Cache Entry Type
//!
//! This module provides a unified `CacheEntry<K, V, M>` structure used across
//! all cache algorithm implementations. The generic `M` parameter lets each
//! algorithm attach its own metadata without affecting the core entry layout.
//!
//! # Design Philosophy
//!
//! - **Consistency**: every cache algorithm uses the same core entry structure.
//! - **Extensibility**: algorithm-specific metadata via the `M` generic parameter.
//!   `M = ()` for algorithms (LRU) that need nothing beyond list position.
//!
//! # Examples
//!
//! ```
//! use polycache::entry::CacheEntry;
//!
//! let entry: CacheEntry<&str, i32, ()> = CacheEntry::new("key", 42);
//! assert_eq!(entry.key, "key");
//! assert_eq!(entry.value, 42);
//! ```

/// Unified cache entry holding a key, a value, and algorithm-specific metadata.
///
/// The `M` parameter allows each algorithm to store its own per-entry state
/// without affecting the core entry structure. Use `()` for algorithms like
/// LRU that don't need extra metadata beyond list position.
pub struct CacheEntry<K, V, M = ()> {
    /// The cached key.
    pub key: K,

    /// The cached value.
    pub value: V,

    /// Algorithm-specific metadata (frequency, access count, ...).
    /// `None` for algorithms that don't need per-entry metadata.
    pub metadata: Option<M>,
}

impl<K, V, M> CacheEntry<K, V, M> {
    /// Creates a new entry without algorithm-specific metadata.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            metadata: None,
        }
    }

    /// Creates a new entry with algorithm-specific metadata attached.
    #[inline]
    pub fn with_metadata(key: K, value: V, metadata: M) -> Self {
        Self {
            key,
            value,
            metadata: Some(metadata),
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, M: std::fmt::Debug> std::fmt::Debug
    for CacheEntry<K, V, M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("metadata", &self.metadata)
            .finish()
    }
}
