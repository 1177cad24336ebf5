//! Configuration for the sharded (hash-partitioned) LRU cache.

use std::fmt;
use std::num::NonZeroUsize;

/// Configuration for a [`crate::HashLruCache`].
///
/// `total_capacity` is divided as evenly as possible across `shards`
/// independently-locked segments. Passing `shards = 0` defers to
/// `std::thread::available_parallelism()` at construction time.
///
/// # Examples
///
/// ```
/// use polycache::config::HashLruCacheConfig;
/// use std::num::NonZeroUsize;
///
/// let config = HashLruCacheConfig::new(NonZeroUsize::new(100).unwrap(), 4);
/// assert_eq!(config.shards(), 4);
/// ```
#[derive(Clone, Copy)]
pub struct HashLruCacheConfig {
    total_capacity: NonZeroUsize,
    shards: usize,
}

impl HashLruCacheConfig {
    /// Creates a new configuration. `shards = 0` means "use host parallelism".
    pub fn new(total_capacity: NonZeroUsize, shards: usize) -> Self {
        Self {
            total_capacity,
            shards,
        }
    }

    /// Returns the total capacity across all shards.
    pub fn total_capacity(&self) -> NonZeroUsize {
        self.total_capacity
    }

    /// Returns the configured shard count (`0` means "auto").
    pub fn shards(&self) -> usize {
        self.shards
    }
}

impl fmt::Debug for HashLruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLruCacheConfig")
            .field("total_capacity", &self.total_capacity)
            .field("shards", &self.shards)
            .finish()
    }
}
