//! Configuration for the Least Frequently Used (LFU) cache.

use std::fmt;
use std::num::NonZeroUsize;

/// Default threshold for the average-frequency aging sweep.
pub const DEFAULT_MAX_AVG_FREQ: usize = 10;

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// LFU tracks the access frequency of each item and evicts the least
/// frequently used item when the cache reaches capacity. `max_avg_freq`
/// bounds how large the running average frequency is allowed to grow before
/// every entry's counter is aged down (see [`crate::LfuCache`]).
///
/// # Examples
///
/// ```
/// use polycache::config::LfuCacheConfig;
/// use std::num::NonZeroUsize;
///
/// let config = LfuCacheConfig::new(NonZeroUsize::new(100).unwrap());
/// assert_eq!(config.max_avg_freq(), 10);
/// ```
#[derive(Clone, Copy)]
pub struct LfuCacheConfig {
    capacity: NonZeroUsize,
    max_avg_freq: usize,
}

impl LfuCacheConfig {
    /// Creates a config with the default aging threshold (10).
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            max_avg_freq: DEFAULT_MAX_AVG_FREQ,
        }
    }

    /// Creates a config with an explicit aging threshold.
    pub fn with_max_avg_freq(capacity: NonZeroUsize, max_avg_freq: usize) -> Self {
        Self {
            capacity,
            max_avg_freq,
        }
    }

    /// Returns the maximum number of key-value pairs the cache can hold.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Returns the average-frequency threshold that triggers aging.
    pub fn max_avg_freq(&self) -> usize {
        self.max_avg_freq
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .field("max_avg_freq", &self.max_avg_freq)
            .finish()
    }
}
