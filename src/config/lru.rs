//! Configuration for the Least Recently Used (LRU) cache.

use std::fmt;
use std::num::NonZeroUsize;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Examples
///
/// ```
/// use polycache::config::LruCacheConfig;
/// use std::num::NonZeroUsize;
///
/// let config = LruCacheConfig::new(NonZeroUsize::new(100).unwrap());
/// assert_eq!(config.capacity().get(), 100);
/// ```
#[derive(Clone, Copy)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Creates a new configuration for an LRU cache.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// Returns the maximum number of key-value pairs the cache can hold.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
