//! Least Recently Used (LRU) Cache Implementation
//!
//! An LRU cache evicts the least recently accessed item when capacity is reached.
//! This implementation provides O(1) time complexity for all operations using a
//! hash map combined with a doubly-linked list.
//!
//! # How the Algorithm Works
//!
//! The LRU algorithm is based on the principle of **temporal locality**: items accessed
//! recently are likely to be accessed again soon. The cache maintains items ordered by
//! their last access time.
//!
//! ## Data Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        LRU Cache                                │
//! │                                                                 │
//! │  HashMap<K, *Node>          Doubly-Linked List                  │
//! │  ┌──────────────┐          ┌──────────────────────────────┐    │
//! │  │ "apple" ──────────────▶ │ MRU ◀──▶ ... ◀──▶ LRU       │    │
//! │  │ "banana" ─────────────▶ │  ▲                    │      │    │
//! │  │ "cherry" ─────────────▶ │  │                    ▼      │    │
//! │  └──────────────┘          │ head              tail       │    │
//! │                            └──────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **HashMap**: Provides O(1) key lookup, storing pointers to list nodes
//! - **Doubly-Linked List**: Maintains access order (most recent at head, least recent at tail)
//!
//! ## Operations
//!
//! | Operation | Action | Time |
//! |-----------|--------|------|
//! | `try_get(key)` | Move accessed node to head (MRU position) | O(1) |
//! | `put(key, value)` | Insert at head, evict from tail if full | O(1) |
//! | `remove(key)` | Unlink node from list, remove from map | O(1) |
//!
//! # Thread Safety
//!
//! Every `LruCache` is internally synchronized by a single `parking_lot::Mutex`
//! guarding the segment, so `put`/`try_get` take `&self` and the cache can be
//! shared behind an `Arc` without any external wrapping.

use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Entry as ListEntry, List};
use crate::policy::CachePolicy;
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU segment containing the actual cache algorithm.
///
/// Shared by [`LruCache`] and the sharded [`crate::HashLruCache`], each
/// segment guarded by its own lock.
///
/// # Safety
///
/// This struct contains raw pointers in the `map` field. These pointers are
/// always valid as long as the node they point to came from `list.add()` and
/// has not since been removed.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    list: List<CacheEntry<K, V>>,
    map: HashMap<K, *mut ListEntry<CacheEntry<K, V>>, S>,
}

// SAFETY: LruSegment owns all data; raw pointers only ever point at nodes
// owned by `list`. Access is serialized by the Mutex that wraps this segment.
unsafe impl<K: Send, V: Send, S: Send> Send for LruSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn new(capacity: NonZeroUsize, hasher: S) -> Self {
        let map_capacity = capacity.get().next_power_of_two();
        LruSegment {
            capacity,
            list: List::new(capacity),
            map: HashMap::with_capacity_and_hasher(map_capacity, hasher),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our map and is always a valid, non-sigil entry.
        unsafe {
            self.list.move_to_front(node);
            Some(&self.list.get_value(node)?.value)
        }
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our map and is always a valid, non-sigil entry.
            unsafe {
                self.list.move_to_front(node);
                let entry = self.list.get_value_mut(node)?;
                let old_key = std::mem::replace(&mut entry.key, key);
                let old_value = std::mem::replace(&mut entry.value, value);
                return Some((old_key, old_value));
            }
        }

        let evicted = if self.map.len() >= self.capacity.get() {
            self.evict_one()
        } else {
            None
        };

        let cache_entry = CacheEntry::new(key.clone(), value);
        if let Some(node) = self.list.add(cache_entry) {
            self.map.insert(key, node);
        }

        evicted
    }

    fn evict_one(&mut self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let old_entry = self.list.remove_last()?;
        // SAFETY: remove_last only ever returns non-sigil nodes.
        let cache_entry = unsafe { old_entry.get_value() };
        let evicted_key = cache_entry.key.clone();
        let evicted_value = cache_entry.value.clone();
        self.map.remove(&evicted_key);
        Some((evicted_key, evicted_value))
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node came from our map, so it points at a live non-sigil node.
        let boxed = unsafe { self.list.remove(node)? };
        // SAFETY: see above.
        Some(unsafe { boxed.get_value() }.value.clone())
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }
}

impl<K, V, S> std::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

/// A Least Recently Used (LRU) cache with O(1) operations.
///
/// Maintains items in order of access recency. When capacity is reached,
/// the least recently accessed item is evicted to make room for new entries.
///
/// # Example
///
/// ```
/// use polycache::LruCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// let cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
/// assert_eq!(cache.try_get(&"apple"), Some(1));
///
/// // "banana" is now LRU, so it gets evicted
/// cache.put("cherry", 3);
/// assert_eq!(cache.try_get(&"banana"), None);
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new LRU cache with the given capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruCache {
            segment: Mutex::new(LruSegment::new(capacity, DefaultHashBuilder::default())),
        }
    }

    /// Creates a new LRU cache from a [`LruCacheConfig`].
    pub fn from_config(config: LruCacheConfig) -> Self {
        Self::new(config.capacity())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with an explicit hasher.
    pub fn with_hasher(capacity: NonZeroUsize, hasher: S) -> Self {
        LruCache {
            segment: Mutex::new(LruSegment::new(capacity, hasher)),
        }
    }

    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the current number of entries in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Removes a key from the cache, returning its value if present.
    #[inline]
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().remove(key)
    }

    /// Removes all entries from the cache.
    #[inline]
    pub fn clear(&self) {
        self.segment.lock().clear()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LruCache<K, V, S> {
    /// Inserts a key-value pair into the cache, moving it to the MRU position.
    ///
    /// If the cache is at capacity, the least recently used entry is evicted.
    fn put(&self, key: K, value: V) {
        self.segment.lock().put(key, value);
    }

    /// Returns a clone of the value for `key`, moving it to the MRU position.
    fn try_get(&self, key: &K) -> Option<V> {
        self.segment.lock().get(key).cloned()
    }
}

impl<K, V, S> std::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache").field("segment", &self.segment).finish()
    }
}
