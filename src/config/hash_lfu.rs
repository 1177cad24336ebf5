//! Configuration for the sharded (hash-partitioned) LFU cache.

use std::fmt;
use std::num::NonZeroUsize;

use super::lfu::DEFAULT_MAX_AVG_FREQ;

/// Configuration for a [`crate::HashLfuCache`].
///
/// As with [`crate::config::HashLruCacheConfig`], `total_capacity` is divided
/// as evenly as possible across `shards` independently-locked LFU segments,
/// and `shards = 0` defers to `std::thread::available_parallelism()`.
/// `max_avg_freq` is forwarded to every shard's own aging sweep.
///
/// # Examples
///
/// ```
/// use polycache::config::HashLfuCacheConfig;
/// use std::num::NonZeroUsize;
///
/// let config = HashLfuCacheConfig::new(NonZeroUsize::new(100).unwrap(), 4);
/// assert_eq!(config.max_avg_freq(), 10);
/// ```
#[derive(Clone, Copy)]
pub struct HashLfuCacheConfig {
    total_capacity: NonZeroUsize,
    shards: usize,
    max_avg_freq: usize,
}

impl HashLfuCacheConfig {
    /// Creates a new configuration with the default aging threshold (10).
    pub fn new(total_capacity: NonZeroUsize, shards: usize) -> Self {
        Self {
            total_capacity,
            shards,
            max_avg_freq: DEFAULT_MAX_AVG_FREQ,
        }
    }

    /// Creates a new configuration with an explicit aging threshold.
    pub fn with_max_avg_freq(total_capacity: NonZeroUsize, shards: usize, max_avg_freq: usize) -> Self {
        Self {
            total_capacity,
            shards,
            max_avg_freq,
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

    /// Returns the average-frequency threshold forwarded to each shard.
    pub fn max_avg_freq(&self) -> usize {
        self.max_avg_freq
    }
}

impl fmt::Debug for HashLfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLfuCacheConfig")
            .field("total_capacity", &self.total_capacity)
            .field("shards", &self.shards)
            .field("max_avg_freq", &self.max_avg_freq)
            .finish()
    }
}
