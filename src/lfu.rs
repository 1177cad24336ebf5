//! Least Frequently Used (LFU) Cache Implementation
//!
//! An LFU cache evicts the least frequently accessed item when capacity is reached.
//! This implementation tracks access frequency for each item and maintains items
//! organized by their frequency count using a combination of hash map and
//! frequency-indexed lists.
//!
//! # How the Algorithm Works
//!
//! LFU is based on the principle that items accessed more frequently in the past
//! are more likely to be accessed again in the future. Unlike LRU which only considers
//! recency, LFU considers the total number of accesses.
//!
//! ## Data Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              LFU Cache                                       │
//! │                                                                              │
//! │  HashMap<K, *Node>              BTreeMap<Frequency, List>                    │
//! │  ┌──────────────┐              ┌─────────────────────────────────────────┐   │
//! │  │ "hot" ──────────────────────│ freq=10: [hot] ◀──▶ [warm]              │   │
//! │  │ "warm" ─────────────────────│ freq=5:  [item_a] ◀──▶ [item_b]         │   │
//! │  │ "cold" ─────────────────────│ freq=1:  [cold] ◀──▶ [new_item]  ← LFU  │   │
//! │  └──────────────┘              └─────────────────────────────────────────┘   │
//! │                                        ▲                                     │
//! │                                        │                                     │
//! │                                   min_frequency=1                            │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **HashMap**: Provides O(1) key lookup, storing pointers to list nodes
//! - **BTreeMap**: Maps frequency counts to lists of items with that frequency
//! - **min_frequency**: Tracks the lowest frequency for O(1) eviction
//!
//! ## Operations
//!
//! | Operation | Action | Time |
//! |-----------|--------|------|
//! | `try_get(key)` | Increment frequency, move to new frequency list | O(1) |
//! | `put(key, value)` | Insert at frequency 1, evict lowest freq if full | O(1) |
//! | `remove(key)` | Remove from frequency list, update min_frequency | O(1) |
//!
//! ## Access Pattern Example
//!
//! ```text
//! Cache capacity: 3
//!
//! put("a", 1)  →  freq_1: [a]
//! put("b", 2)  →  freq_1: [b, a]
//! put("c", 3)  →  freq_1: [c, b, a]
//! get("a")     →  freq_1: [c, b], freq_2: [a]
//! get("a")     →  freq_1: [c, b], freq_3: [a]
//! put("d", 4)  →  freq_1: [d, c], freq_3: [a]   // "b" evicted (LFU at freq_1)
//! ```
//!
//! # Frequency Aging
//!
//! Pure LFU suffers from cache pollution: items popular long ago but no longer
//! accessed can occupy a slot indefinitely on the strength of a high historical
//! frequency. This implementation tracks the running average frequency across
//! all entries and, once it exceeds [`crate::config::LfuCacheConfig::max_avg_freq`],
//! halves every entry's frequency counter (floored at 1) and rebuilds the
//! frequency buckets. See [`LfuCache::age`].
//!
//! # Thread Safety
//!
//! Every `LfuCache` is internally synchronized by a single `parking_lot::Mutex`
//! guarding the segment, so `put`/`try_get` take `&self`.

use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Entry as ListEntry, List};
use crate::meta::FreqMeta;
use crate::policy::CachePolicy;
use std::borrow::Borrow;
use std::collections::BTreeMap;
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

type Entry<K, V> = CacheEntry<K, V, FreqMeta>;

/// Internal LFU segment containing the actual cache algorithm.
///
/// Shared by [`LfuCache`] and the sharded [`crate::HashLfuCache`].
///
/// # Safety
///
/// This struct contains raw pointers in the `map` field. These pointers are
/// always valid as long as the node they point to came from one of
/// `frequency_lists`'s `add()` calls and has not since been removed.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    max_avg_freq: usize,
    min_frequency: Option<usize>,
    total_frequency: usize,
    map: HashMap<K, *mut ListEntry<Entry<K, V>>, S>,
    frequency_lists: BTreeMap<usize, List<Entry<K, V>>>,
}

// SAFETY: LfuSegment owns all data; raw pointers only ever point at nodes
// owned by one of `frequency_lists`. Access is serialized by the Mutex that
// wraps this segment.
unsafe impl<K: Send, V: Send, S: Send> Send for LfuSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    pub(crate) fn new(capacity: NonZeroUsize, max_avg_freq: usize, hasher: S) -> Self {
        let map_capacity = capacity.get().next_power_of_two();
        LfuSegment {
            capacity,
            max_avg_freq,
            min_frequency: None,
            total_frequency: 0,
            map: HashMap::with_capacity_and_hasher(map_capacity, hasher),
            frequency_lists: BTreeMap::new(),
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

    fn average_frequency(&self) -> usize {
        if self.map.is_empty() {
            0
        } else {
            self.total_frequency / self.map.len()
        }
    }

    /// Rebuilds every frequency bucket with each entry's frequency halved
    /// (floored at 1). Called automatically from `put` once the running
    /// average frequency exceeds `max_avg_freq`.
    pub(crate) fn age(&mut self)
    where
        K: Clone,
    {
        let old_lists = std::mem::take(&mut self.frequency_lists);
        self.total_frequency = 0;
        for (_, mut list) in old_lists {
            while let Some(boxed) = list.remove_first() {
                let raw = Box::into_raw(boxed);
                // SAFETY: raw came from a non-sigil node just detached from its list.
                let entry = unsafe { (*raw).get_value_mut() };
                let new_freq = (entry.metadata.unwrap().frequency / 2).max(1);
                entry.metadata = Some(FreqMeta::new(new_freq));
                self.total_frequency += new_freq;

                self.frequency_lists
                    .entry(new_freq)
                    .or_insert_with(|| List::new(self.capacity));
                let bucket = self.frequency_lists.get_mut(&new_freq).unwrap();
                // SAFETY: raw is a freshly-owned, detached node; attach takes ownership back.
                unsafe { bucket.attach_from_other_list(raw) };
                // SAFETY: raw is still valid; attach_from_other_list only relinked pointers.
                let key = unsafe { (*raw).get_value() }.key.clone();
                *self.map.get_mut(&key).unwrap() = raw;
            }
        }
        self.min_frequency = self.frequency_lists.keys().next().copied();
    }

    fn bump_frequency(&mut self, node: *mut ListEntry<Entry<K, V>>, old_frequency: usize)
    where
        K: Clone,
    {
        let new_frequency = old_frequency + 1;
        self.total_frequency += 1;

        // SAFETY: node is valid, owned by `frequency_lists[old_frequency]`.
        let boxed_entry = unsafe {
            self.frequency_lists
                .get_mut(&old_frequency)
                .unwrap()
                .remove(node)
                .unwrap()
        };

        if self.frequency_lists[&old_frequency].is_empty() {
            self.frequency_lists.remove(&old_frequency);
            if self.min_frequency == Some(old_frequency) {
                self.min_frequency = Some(new_frequency);
            }
        }

        let entry_ptr = Box::into_raw(boxed_entry);
        // SAFETY: entry_ptr was just boxed from a non-sigil node.
        unsafe { (*entry_ptr).get_value_mut() }.metadata = Some(FreqMeta::new(new_frequency));

        self.frequency_lists
            .entry(new_frequency)
            .or_insert_with(|| List::new(self.capacity));
        // SAFETY: entry_ptr is freshly boxed and not attached to any list.
        unsafe {
            self.frequency_lists
                .get_mut(&new_frequency)
                .unwrap()
                .attach_from_other_list(entry_ptr);
        }

        // SAFETY: entry_ptr is still valid after being re-attached above.
        let key = unsafe { (*entry_ptr).get_value() }.key.clone();
        *self.map.get_mut(&key).unwrap() = entry_ptr;
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        // SAFETY: node comes from our map.
        let frequency = unsafe { (*node).get_value() }.metadata.unwrap().frequency;
        self.bump_frequency(node, frequency);
        let node = *self.map.get(key).unwrap();
        // SAFETY: node comes from our map and was just re-inserted by bump_frequency.
        Some(&unsafe { (*node).get_value() }.value)
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our map.
            let entry = unsafe { (*node).get_value() };
            let frequency = entry.metadata.unwrap().frequency;
            let old_key = entry.key.clone();
            let old_value = entry.value.clone();
            // SAFETY: node comes from our map, so it points at a live node.
            unsafe { (*node).get_value_mut() }.value = value;
            self.bump_frequency(node, frequency);
            return Some((old_key, old_value));
        }

        let evicted = if self.map.len() >= self.capacity.get() {
            self.evict_one()
        } else {
            None
        };

        self.min_frequency = Some(1);
        self.total_frequency += 1;
        self.frequency_lists
            .entry(1)
            .or_insert_with(|| List::new(self.capacity));
        let cache_entry = Entry::with_metadata(key.clone(), value, FreqMeta::new(1));
        if let Some(node) = self.frequency_lists.get_mut(&1).unwrap().add(cache_entry) {
            self.map.insert(key, node);
        }

        if self.average_frequency() > self.max_avg_freq {
            self.age();
        }

        evicted
    }

    fn evict_one(&mut self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let min_freq = self.min_frequency?;
        let min_list = self.frequency_lists.get_mut(&min_freq)?;
        let old_entry = min_list.remove_last()?;
        // SAFETY: remove_last only ever returns non-sigil nodes.
        let cache_entry = unsafe { old_entry.get_value() };
        let evicted_key = cache_entry.key.clone();
        let evicted_value = cache_entry.value.clone();
        self.total_frequency = self.total_frequency.saturating_sub(min_freq);
        self.map.remove(&evicted_key);

        if self.frequency_lists[&min_freq].is_empty() {
            self.frequency_lists.remove(&min_freq);
            self.min_frequency = self.frequency_lists.keys().next().copied();
        }

        Some((evicted_key, evicted_value))
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.frequency_lists.clear();
        self.min_frequency = None;
        self.total_frequency = 0;
    }
}

impl<K, V, S> std::fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("min_frequency", &self.min_frequency)
            .finish()
    }
}

/// A Least Frequently Used (LFU) cache.
///
/// The cache tracks the frequency of access for each item and evicts the least
/// frequently used items when the cache reaches capacity. In case of a tie in
/// frequency, the least recently used item among those with the same frequency
/// is evicted.
///
/// # Example
///
/// ```
/// use polycache::LfuCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// let cache = LfuCache::new(NonZeroUsize::new(3).unwrap());
///
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3);
///
/// cache.try_get(&"a");
/// cache.try_get(&"a");
///
/// cache.put("d", 4); // evicts "b" or "c" (lowest frequency)
/// assert_eq!(cache.try_get(&"a"), Some(1));
/// ```
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LfuSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LfuCache<K, V> {
    /// Creates a new LFU cache with the given capacity and the default aging
    /// threshold (see [`crate::config::lfu::DEFAULT_MAX_AVG_FREQ`]).
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::from_config(LfuCacheConfig::new(capacity))
    }

    /// Creates a new LFU cache from a [`LfuCacheConfig`].
    pub fn from_config(config: LfuCacheConfig) -> Self {
        LfuCache {
            segment: Mutex::new(LfuSegment::new(
                config.capacity(),
                config.max_avg_freq(),
                DefaultHashBuilder::default(),
            )),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a new LFU cache with an explicit hasher.
    pub fn with_hasher(capacity: NonZeroUsize, max_avg_freq: usize, hasher: S) -> Self {
        LfuCache {
            segment: Mutex::new(LfuSegment::new(capacity, max_avg_freq, hasher)),
        }
    }

    /// Returns the maximum number of key-value pairs the cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the current number of key-value pairs in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no key-value pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Wipes all state (entries, frequency buckets, running average), without
    /// destroying the cache itself.
    #[inline]
    pub fn purge(&self) {
        self.segment.lock().clear()
    }

    /// Forces an aging sweep, halving every entry's frequency counter
    /// (floored at 1) regardless of the current average frequency.
    #[inline]
    pub fn age(&self)
    where
        K: Clone,
    {
        self.segment.lock().age()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LfuCache<K, V, S> {
    /// Inserts a key-value pair at frequency 1 (or preserves the existing
    /// frequency on update), evicting the least-frequently-used entry if the
    /// cache is at capacity.
    fn put(&self, key: K, value: V) {
        self.segment.lock().put(key, value);
    }

    /// Returns a clone of the value for `key`, incrementing its frequency.
    fn try_get(&self, key: &K) -> Option<V> {
        self.segment.lock().get(key).cloned()
    }
}

impl<K, V, S> std::fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuCache").field("segment", &self.segment).finish()
    }
}
