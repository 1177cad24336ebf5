//! Lock-striped sharded caches.
//!
//! [`HashLruCache`] and [`HashLfuCache`] partition a total capacity across
//! several independently-locked segments, routing each key to exactly one
//! shard by hash. This trades a single global eviction ordering for reduced
//! lock contention: eviction decisions are correct per-shard, not globally
//! optimal across the whole cache.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                    HashLruCache (N segments)                       │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐     ┌─────────┐              │
//! │  │Segment 0│ │Segment 1│ │Segment 2│ ... │SegmentN │              │
//! │  │ [Mutex] │ │ [Mutex] │ │ [Mutex] │     │ [Mutex] │              │
//! │  └─────────┘ └─────────┘ └─────────┘     └─────────┘              │
//! │       ▲           ▲           ▲               ▲                   │
//! │  hash(k1)%N    hash(k2)%N  hash(k3)%N     hash(kN)%N              │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use crate::config::{HashLfuCacheConfig, HashLruCacheConfig};
use crate::lfu::LfuSegment;
use crate::lru::LruSegment;
use crate::policy::CachePolicy;
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Resolves a caller-supplied shard count: `0` defers to
/// `std::thread::available_parallelism()` (falling back to `1`).
fn resolve_shard_count(shards: usize) -> usize {
    if shards > 0 {
        return shards;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Splits `total_capacity` as evenly as possible across `shard_count`
/// shards, each at least 1.
fn per_shard_capacity(total_capacity: NonZeroUsize, shard_count: usize) -> NonZeroUsize {
    let per_shard = total_capacity.get().div_ceil(shard_count).max(1);
    NonZeroUsize::new(per_shard).unwrap()
}

fn shard_index<K: Hash + ?Sized, S: BuildHasher>(key: &K, hasher: &S, shard_count: usize) -> usize {
    // The modulus is `shard_count as u64`, so the result always fits back in `usize`.
    #[allow(clippy::cast_possible_truncation)]
    {
        (hasher.hash_one(key) % shard_count as u64) as usize
    }
}

/// A Least Recently Used cache sharded across several independently-locked
/// segments for reduced lock contention under concurrent access.
///
/// # Example
///
/// ```
/// use polycache::HashLruCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// // 0 shards defers to `std::thread::available_parallelism()`.
/// let cache = HashLruCache::new(NonZeroUsize::new(1000).unwrap(), 4);
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.try_get(&"key".to_string()), Some(42));
/// ```
pub struct HashLruCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[Mutex<LruSegment<K, V, S>>]>,
    hasher: S,
    total_capacity: NonZeroUsize,
}

impl<K: Hash + Eq, V> HashLruCache<K, V> {
    /// Creates a new sharded LRU cache. `shards = 0` defers to
    /// `std::thread::available_parallelism()`.
    pub fn new(total_capacity: NonZeroUsize, shards: usize) -> Self {
        Self::from_config(HashLruCacheConfig::new(total_capacity, shards))
    }

    /// Creates a new sharded LRU cache from a [`HashLruCacheConfig`].
    pub fn from_config(config: HashLruCacheConfig) -> Self {
        let shard_count = resolve_shard_count(config.shards());
        let per_shard = per_shard_capacity(config.total_capacity(), shard_count);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(LruSegment::new(per_shard, DefaultHashBuilder::default())))
            .collect();
        HashLruCache {
            shards,
            hasher: DefaultHashBuilder::default(),
            total_capacity: config.total_capacity(),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> HashLruCache<K, V, S> {
    fn shard_for<Q: Hash + ?Sized>(&self, key: &Q) -> &Mutex<LruSegment<K, V, S>> {
        &self.shards[shard_index(key, &self.hasher, self.shards.len())]
    }

    /// Returns the total capacity configured across all shards (the actual
    /// resident capacity may be slightly higher due to per-shard rounding).
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.total_capacity
    }

    /// Returns the current number of entries across all shards.
    #[inline]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Removes a key from whichever shard it hashes to, returning its value
    /// if present.
    #[inline]
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.shard_for(key).lock().remove(key)
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Clone> CachePolicy<K, V>
    for HashLruCache<K, V, S>
{
    fn put(&self, key: K, value: V) {
        self.shard_for(&key).lock().put(key, value);
    }

    fn try_get(&self, key: &K) -> Option<V> {
        self.shard_for(key).lock().get(key).cloned()
    }
}

impl<K, V, S> std::fmt::Debug for HashLruCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashLruCache")
            .field("shard_count", &self.shards.len())
            .field("total_capacity", &self.total_capacity)
            .finish()
    }
}

/// A Least Frequently Used cache sharded across several independently-locked
/// segments for reduced lock contention under concurrent access.
///
/// # Example
///
/// ```
/// use polycache::HashLfuCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// let cache = HashLfuCache::new(NonZeroUsize::new(1000).unwrap(), 4);
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.try_get(&"key".to_string()), Some(42));
/// ```
pub struct HashLfuCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[Mutex<LfuSegment<K, V, S>>]>,
    hasher: S,
    total_capacity: NonZeroUsize,
}

impl<K: Hash + Eq, V> HashLfuCache<K, V> {
    /// Creates a new sharded LFU cache with the default aging threshold.
    /// `shards = 0` defers to `std::thread::available_parallelism()`.
    pub fn new(total_capacity: NonZeroUsize, shards: usize) -> Self {
        Self::from_config(HashLfuCacheConfig::new(total_capacity, shards))
    }

    /// Creates a new sharded LFU cache from a [`HashLfuCacheConfig`].
    pub fn from_config(config: HashLfuCacheConfig) -> Self {
        let shard_count = resolve_shard_count(config.shards());
        let per_shard = per_shard_capacity(config.total_capacity(), shard_count);
        let shards = (0..shard_count)
            .map(|_| {
                Mutex::new(LfuSegment::new(
                    per_shard,
                    config.max_avg_freq(),
                    DefaultHashBuilder::default(),
                ))
            })
            .collect();
        HashLfuCache {
            shards,
            hasher: DefaultHashBuilder::default(),
            total_capacity: config.total_capacity(),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> HashLfuCache<K, V, S> {
    fn shard_for<Q: Hash + ?Sized>(&self, key: &Q) -> &Mutex<LfuSegment<K, V, S>> {
        &self.shards[shard_index(key, &self.hasher, self.shards.len())]
    }

    /// Returns the total capacity configured across all shards (the actual
    /// resident capacity may be slightly higher due to per-shard rounding).
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.total_capacity
    }

    /// Returns the current number of entries across all shards.
    #[inline]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Wipes all state in every shard without destroying the cache itself.
    #[inline]
    pub fn purge(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Clone> CachePolicy<K, V>
    for HashLfuCache<K, V, S>
{
    fn put(&self, key: K, value: V) {
        self.shard_for(&key).lock().put(key, value);
    }

    fn try_get(&self, key: &K) -> Option<V> {
        self.shard_for(key).lock().get(key).cloned()
    }
}

impl<K, V, S> std::fmt::Debug for HashLfuCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashLfuCache")
            .field("shard_count", &self.shards.len())
            .field("total_capacity", &self.total_capacity)
            .finish()
    }
}
