//! Configuration for the LRU-K admission filter.

use std::fmt;
use std::num::NonZeroUsize;

/// Configuration for an [`crate::LruKCache`].
///
/// `main_capacity` bounds the admitted (main) cache; `history_capacity`
/// bounds the pending-observation tracker; `k` is the number of observations
/// (via `get` or `put`) a key needs before it is admitted to the main cache.
///
/// # Examples
///
/// ```
/// use polycache::config::LruKCacheConfig;
/// use std::num::NonZeroUsize;
///
/// let config = LruKCacheConfig::new(
///     NonZeroUsize::new(1).unwrap(),
///     NonZeroUsize::new(4).unwrap(),
///     2,
/// );
/// assert_eq!(config.k(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct LruKCacheConfig {
    main_capacity: NonZeroUsize,
    history_capacity: NonZeroUsize,
    k: usize,
}

impl LruKCacheConfig {
    /// Creates a new configuration.
    pub fn new(main_capacity: NonZeroUsize, history_capacity: NonZeroUsize, k: usize) -> Self {
        Self {
            main_capacity,
            history_capacity,
            k: k.max(1),
        }
    }

    /// Returns the main cache's capacity.
    pub fn main_capacity(&self) -> NonZeroUsize {
        self.main_capacity
    }

    /// Returns the history tracker's capacity.
    pub fn history_capacity(&self) -> NonZeroUsize {
        self.history_capacity
    }

    /// Returns the number of observations required for admission.
    pub fn k(&self) -> usize {
        self.k
    }
}

impl fmt::Debug for LruKCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCacheConfig")
            .field("main_capacity", &self.main_capacity)
            .field("history_capacity", &self.history_capacity)
            .field("k", &self.k)
            .finish()
    }
}
