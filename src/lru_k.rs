//! LRU-K admission filter.
//!
//! Wraps a main [`LruCache`] behind a secondary "history" cache that counts
//! observations per key. A key is only admitted to the main cache once it
//! has been observed (via `get` or `put`) `k` times, keeping one-off scan
//! traffic out of the main cache entirely.
//!
//! # Thread Safety
//!
//! Both the main and history caches are independently `parking_lot::Mutex`
//! guarded (see [`LruCache`]), so `put`/`try_get` take `&self`.

use crate::config::LruKCacheConfig;
use crate::lru::LruCache;
use crate::policy::CachePolicy;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// An LRU-K admission filter in front of a main [`LruCache`].
///
/// # Example
///
/// ```
/// use polycache::LruKCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// let cache = LruKCache::new(
///     NonZeroUsize::new(10).unwrap(),
///     NonZeroUsize::new(10).unwrap(),
///     2,
/// );
/// cache.put(1, "a");
/// assert_eq!(cache.try_get(&1), None); // only observed once so far
/// cache.put(1, "a");
/// assert_eq!(cache.try_get(&1), Some("a"));
/// ```
pub struct LruKCache<K, V> {
    main: LruCache<K, V>,
    history: LruCache<K, u32>,
    k: usize,
}

impl<K: Hash + Eq + Clone, V: Clone> LruKCache<K, V> {
    /// Creates a new LRU-K cache.
    ///
    /// `main_capacity` bounds the admitted cache, `history_capacity` bounds
    /// the pending-observation tracker, and `k` is the number of
    /// observations a key needs before admission.
    pub fn new(main_capacity: NonZeroUsize, history_capacity: NonZeroUsize, k: usize) -> Self {
        Self::from_config(LruKCacheConfig::new(main_capacity, history_capacity, k))
    }

    /// Creates a new LRU-K cache from an [`LruKCacheConfig`].
    pub fn from_config(config: LruKCacheConfig) -> Self {
        LruKCache {
            main: LruCache::new(config.main_capacity()),
            history: LruCache::new(config.history_capacity()),
            k: config.k(),
        }
    }

    /// Records an observation of `key` in the history tracker, returning its
    /// new observation count.
    fn observe(&self, key: &K) -> u32 {
        let count = self.history.try_get(key).unwrap_or(0) + 1;
        self.history.put(key.clone(), count);
        count
    }

    /// Returns the maximum number of entries the main cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.main.cap()
    }

    /// Returns the current number of entries admitted to the main cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.main.len()
    }

    /// Returns `true` if the main cache holds no admitted entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> CachePolicy<K, V> for LruKCache<K, V> {
    /// Overwrites `key` directly if it is already admitted to the main
    /// cache. Otherwise records an observation; once the observation count
    /// reaches `k`, the key is admitted to the main cache and its history
    /// entry is dropped.
    fn put(&self, key: K, value: V) {
        if self.main.try_get(&key).is_some() {
            self.main.put(key, value);
            return;
        }

        let count = self.observe(&key);
        if count as usize >= self.k {
            self.history.remove(&key);
            self.main.put(key, value);
        }
    }

    /// Looks up `key` in the main cache, recording an observation on a miss
    /// so that repeated misses can still accumulate toward admission.
    fn try_get(&self, key: &K) -> Option<V> {
        if let Some(value) = self.main.try_get(key) {
            return Some(value);
        }
        self.observe(key);
        None
    }
}

impl<K, V> std::fmt::Debug for LruKCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruKCache")
            .field("main", &self.main)
            .field("history", &self.history)
            .field("k", &self.k)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache<K: Hash + Eq + Clone, V: Clone>(
        main_cap: usize,
        history_cap: usize,
        k: usize,
    ) -> LruKCache<K, V> {
        LruKCache::new(
            NonZeroUsize::new(main_cap).unwrap(),
            NonZeroUsize::new(history_cap).unwrap(),
            k,
        )
    }

    #[test]
    fn key_is_not_admitted_before_k_observations() {
        let cache = make_cache(4, 4, 2);
        cache.put(1, "a");
        assert_eq!(cache.try_get(&1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn key_is_admitted_on_the_kth_observation() {
        let cache = make_cache(4, 4, 2);
        cache.put(1, "a");
        cache.put(1, "a");
        assert_eq!(cache.try_get(&1), Some("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn gets_on_a_miss_count_as_observations_too() {
        let cache = make_cache(4, 4, 2);
        assert_eq!(cache.try_get(&1), None); // observation 1
        cache.put(1, "a"); // observation 2: admitted directly
        assert_eq!(cache.try_get(&1), Some("a"));
    }

    #[test]
    fn admitted_key_is_overwritten_directly_bypassing_history() {
        let cache = make_cache(4, 4, 1);
        cache.put(1, "a"); // k=1: admitted immediately
        assert_eq!(cache.try_get(&1), Some("a"));
        cache.put(1, "b");
        assert_eq!(cache.try_get(&1), Some("b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn history_capacity_bounds_observation_tracking() {
        let cache: LruKCache<i32, &str> = make_cache(4, 1, 2);
        cache.put(1, "a"); // history: {1: 1}
        cache.put(2, "b"); // history capacity 1 evicts key 1's observation
        cache.put(1, "a"); // back to a fresh observation count of 1
        assert_eq!(cache.try_get(&1), None);
    }

    #[test]
    fn presence_is_tested_with_try_get_not_default_comparison() {
        // A key observed k-1 times must still report as absent even though
        // its value type's default would otherwise be indistinguishable
        // from "present but zero".
        let cache: LruKCache<i32, i32> = make_cache(4, 4, 3);
        cache.put(1, 0);
        cache.put(1, 0);
        assert_eq!(cache.try_get(&1), None);
        assert_eq!(cache.get_or_default(&1), 0);
    }
}
