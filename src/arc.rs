//! Adaptive Replacement Cache (ARC) implementation.
//!
//! ARC keeps two main segments -- one LRU-ordered, one LFU-ordered -- plus a
//! "ghost" list per segment recording the keys most recently evicted from
//! it. A ghost hit means the half that evicted the key was undersized, and
//! the coordinator shifts one unit of capacity from the other half to
//! compensate. An entry that is accessed enough times while resident in the
//! LRU half is mirrored into the LFU half, so frequently-reused keys survive
//! LRU churn.
//!
//! # Thread Safety
//!
//! The coordinator -- both halves and both ghost lists -- sits behind a
//! single `parking_lot::Mutex`, so there is no lock-ordering hazard between
//! the halves.

use crate::config::arc::DEFAULT_TRANSFORM_THRESHOLD;
use crate::config::ArcCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Entry as ListEntry, List};
use crate::meta::{AccessMeta, FreqMeta};
use crate::policy::CachePolicy;
use std::collections::BTreeMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

type LruEntry<K, V> = CacheEntry<K, V, AccessMeta>;
type LfuEntry<K, V> = CacheEntry<K, V, FreqMeta>;

/// `List`'s own capacity check is bypassed throughout this module (every
/// part tracks its own logical, mutable `capacity` and evicts before it
/// would be exceeded), so every list here is constructed with this
/// effectively-unbounded capacity.
fn unbounded() -> NonZeroUsize {
    NonZeroUsize::new(usize::MAX).unwrap()
}

/// A bounded, key-only FIFO of recently evicted keys for one ARC half.
struct Ghost<K> {
    capacity: usize,
    list: List<K>,
    map: HashMap<K, *mut ListEntry<K>>,
}

// SAFETY: Ghost owns all data; raw pointers only ever point at nodes owned
// by `list`. Access is serialized by the Mutex wrapping the whole coordinator.
unsafe impl<K: Send> Send for Ghost<K> {}

impl<K: Hash + Eq + Clone> Ghost<K> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            list: List::new(unbounded()),
            map: HashMap::default(),
        }
    }

    /// Records `key` as just-evicted, dropping the oldest ghost entry if full.
    fn push(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if self.map.len() >= self.capacity {
            if let Some(boxed) = self.list.remove_last() {
                // SAFETY: remove_last only ever returns non-sigil nodes.
                let old_key = unsafe { boxed.get_value() }.clone();
                self.map.remove(&old_key);
            }
        }
        let node = self.list.add_unchecked(key.clone());
        self.map.insert(key, node);
    }

    /// Removes `key` from the ghost list if present, returning whether it was.
    fn remove(&mut self, key: &K) -> bool {
        match self.map.remove(key) {
            Some(node) => {
                // SAFETY: node came from our map, so it points at a live node in `list`.
                unsafe { self.list.remove(node) };
                true
            }
            None => false,
        }
    }
}

/// The LRU half of an [`ArcCache`]. Promotes an entry into the LFU half once
/// it has been accessed `transform_threshold` times while resident here.
pub(crate) struct ArcLruPart<K, V> {
    capacity: usize,
    transform_threshold: usize,
    main_map: HashMap<K, *mut ListEntry<LruEntry<K, V>>>,
    main_list: List<LruEntry<K, V>>,
    ghost: Ghost<K>,
}

// SAFETY: ArcLruPart owns all data; raw pointers only ever point at nodes
// owned by `main_list`. Access is serialized by the coordinator's Mutex.
unsafe impl<K: Send, V: Send> Send for ArcLruPart<K, V> {}

impl<K: Hash + Eq + Clone, V: Clone> ArcLruPart<K, V> {
    fn new(capacity: usize, transform_threshold: usize) -> Self {
        Self {
            capacity,
            transform_threshold,
            main_map: HashMap::default(),
            main_list: List::new(unbounded()),
            ghost: Ghost::new(capacity),
        }
    }

    fn len(&self) -> usize {
        self.main_map.len()
    }

    /// Inserts or overwrites `key`. Returns `true` iff the entry's access
    /// count has reached `transform_threshold`, signalling the coordinator
    /// should mirror it into the LFU half.
    fn put(&mut self, key: K, value: V) -> bool {
        if let Some(&node) = self.main_map.get(&key) {
            // SAFETY: node came from our map, so it points at a live node.
            unsafe {
                self.main_list.move_to_front(node);
                let entry = self.main_list.get_value_mut(node).unwrap();
                entry.value = value;
                let count = entry.metadata.unwrap().access_count + 1;
                entry.metadata = Some(AccessMeta { access_count: count });
                return count >= self.transform_threshold;
            }
        }

        if self.capacity == 0 {
            // Dead half: nothing can be resident, but the miss still teaches
            // the coordinator something via the ghost list.
            self.ghost.push(key);
            return false;
        }

        if self.main_map.len() >= self.capacity {
            self.evict_one();
        }

        let entry = LruEntry::with_metadata(key.clone(), value, AccessMeta::new());
        let node = self.main_list.add_unchecked(entry);
        self.main_map.insert(key, node);
        false
    }

    /// On a hit, returns the value and whether the entry has now reached
    /// `transform_threshold` accesses.
    fn get(&mut self, key: &K) -> Option<(V, bool)> {
        let &node = self.main_map.get(key)?;
        // SAFETY: node came from our map, so it points at a live node.
        unsafe {
            self.main_list.move_to_front(node);
            let entry = self.main_list.get_value_mut(node).unwrap();
            let count = entry.metadata.unwrap().access_count + 1;
            entry.metadata = Some(AccessMeta { access_count: count });
            Some((entry.value.clone(), count >= self.transform_threshold))
        }
    }

    fn evict_one(&mut self) {
        if let Some(boxed) = self.main_list.remove_last() {
            // SAFETY: remove_last only ever returns non-sigil nodes.
            let key = unsafe { boxed.get_value() }.key.clone();
            self.main_map.remove(&key);
            self.ghost.push(key);
        }
    }

    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn grow(&mut self) {
        self.capacity += 1;
    }

    /// Evicts one entry first if currently full, then reduces capacity by
    /// one. Returns `false` (refusing the shift) if capacity is already 0.
    fn shrink(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.main_map.len() >= self.capacity {
            self.evict_one();
        }
        self.capacity -= 1;
        true
    }
}

/// The LFU half of an [`ArcCache`]. Mirrors [`crate::lfu::LfuSegment`]'s
/// frequency-bucket shape, but sends eviction victims to a ghost list of
/// keys rather than simply dropping them.
pub(crate) struct ArcLfuPart<K, V> {
    capacity: usize,
    min_frequency: Option<usize>,
    main_map: HashMap<K, *mut ListEntry<LfuEntry<K, V>>>,
    buckets: BTreeMap<usize, List<LfuEntry<K, V>>>,
    ghost: Ghost<K>,
}

// SAFETY: ArcLfuPart owns all data; raw pointers only ever point at nodes
// owned by one of `buckets`. Access is serialized by the coordinator's Mutex.
unsafe impl<K: Send, V: Send> Send for ArcLfuPart<K, V> {}

impl<K: Hash + Eq + Clone, V: Clone> ArcLfuPart<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            min_frequency: None,
            main_map: HashMap::default(),
            buckets: BTreeMap::new(),
            ghost: Ghost::new(capacity),
        }
    }

    fn len(&self) -> usize {
        self.main_map.len()
    }

    fn bump_frequency(&mut self, node: *mut ListEntry<LfuEntry<K, V>>, old_frequency: usize) {
        let new_frequency = old_frequency + 1;
        // SAFETY: node is valid, owned by `buckets[old_frequency]`.
        let boxed = unsafe {
            self.buckets
                .get_mut(&old_frequency)
                .unwrap()
                .remove(node)
                .unwrap()
        };

        if self.buckets[&old_frequency].is_empty() {
            self.buckets.remove(&old_frequency);
            if self.min_frequency == Some(old_frequency) {
                self.min_frequency = Some(new_frequency);
            }
        }

        let entry_ptr = Box::into_raw(boxed);
        // SAFETY: entry_ptr was just boxed from a non-sigil node.
        unsafe { (*entry_ptr).get_value_mut() }.metadata = Some(FreqMeta::new(new_frequency));

        self.buckets
            .entry(new_frequency)
            .or_insert_with(|| List::new(unbounded()));
        // SAFETY: entry_ptr is freshly boxed and not attached to any list.
        unsafe {
            self.buckets
                .get_mut(&new_frequency)
                .unwrap()
                .attach_from_other_list(entry_ptr);
        }

        // SAFETY: entry_ptr is still valid after being re-attached above.
        let key = unsafe { (*entry_ptr).get_value() }.key.clone();
        *self.main_map.get_mut(&key).unwrap() = entry_ptr;
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(&node) = self.main_map.get(&key) {
            // SAFETY: node came from our map, so it points at a live node.
            let frequency = unsafe { (*node).get_value() }.metadata.unwrap().frequency;
            // SAFETY: node came from our map, so it points at a live node.
            unsafe { (*node).get_value_mut() }.value = value;
            self.bump_frequency(node, frequency);
            return;
        }

        if self.capacity == 0 {
            self.ghost.push(key);
            return;
        }

        if self.main_map.len() >= self.capacity {
            self.evict_one();
        }

        self.min_frequency = Some(1);
        self.buckets.entry(1).or_insert_with(|| List::new(unbounded()));
        let entry = LfuEntry::with_metadata(key.clone(), value, FreqMeta::new(1));
        let node = self.buckets.get_mut(&1).unwrap().add_unchecked(entry);
        self.main_map.insert(key, node);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let &node = self.main_map.get(key)?;
        // SAFETY: node came from our map, so it points at a live node.
        let frequency = unsafe { (*node).get_value() }.metadata.unwrap().frequency;
        self.bump_frequency(node, frequency);
        let &node = self.main_map.get(key).unwrap();
        // SAFETY: node came from our map and was just re-inserted by bump_frequency.
        Some(unsafe { (*node).get_value() }.value.clone())
    }

    fn evict_one(&mut self) {
        let Some(min_freq) = self.min_frequency else {
            return;
        };
        let Some(list) = self.buckets.get_mut(&min_freq) else {
            return;
        };
        let Some(boxed) = list.remove_last() else {
            return;
        };
        // SAFETY: remove_last only ever returns non-sigil nodes.
        let key = unsafe { boxed.get_value() }.key.clone();
        self.main_map.remove(&key);

        if self.buckets[&min_freq].is_empty() {
            self.buckets.remove(&min_freq);
            self.min_frequency = self.buckets.keys().next().copied();
        }

        self.ghost.push(key);
    }

    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn grow(&mut self) {
        self.capacity += 1;
    }

    /// Evicts one entry first if currently full, then reduces capacity by
    /// one. Returns `false` (refusing the shift) if capacity is already 0.
    fn shrink(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.main_map.len() >= self.capacity {
            self.evict_one();
        }
        self.capacity -= 1;
        true
    }
}

struct ArcInner<K, V> {
    lru_part: ArcLruPart<K, V>,
    lfu_part: ArcLfuPart<K, V>,
}

/// Checks both halves' ghost lists for `key` and, on a hit, shifts one unit
/// of capacity from the other half into the half that just proved itself
/// undersized. Returns whether any ghost hit occurred.
fn check_ghost_caches<K: Hash + Eq + Clone, V: Clone>(inner: &mut ArcInner<K, V>, key: &K) -> bool {
    if inner.lru_part.check_ghost(key) {
        if inner.lfu_part.shrink() {
            inner.lru_part.grow();
        }
        true
    } else if inner.lfu_part.check_ghost(key) {
        if inner.lru_part.shrink() {
            inner.lfu_part.grow();
        }
        true
    } else {
        false
    }
}

/// An Adaptive Replacement Cache (ARC).
///
/// ARC balances recency and frequency by maintaining an LRU-ordered half and
/// an LFU-ordered half, each shadowed by a ghost list of recently evicted
/// keys. A ghost hit on one half's list shifts a unit of capacity away from
/// the other half, letting the cache adapt to whichever access pattern is
/// actually occurring.
///
/// # Example
///
/// ```
/// use polycache::ArcCache;
/// use polycache::CachePolicy;
/// use std::num::NonZeroUsize;
///
/// let cache = ArcCache::new(NonZeroUsize::new(4).unwrap());
/// cache.put("a", 1);
/// assert_eq!(cache.try_get(&"a"), Some(1));
/// ```
pub struct ArcCache<K, V> {
    inner: Mutex<ArcInner<K, V>>,
    cap: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V: Clone> ArcCache<K, V> {
    /// Creates a new ARC cache where each half starts at `capacity`
    /// (total resident budget is therefore `2 * capacity`) and the default
    /// promotion threshold.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::from_config(ArcCacheConfig::new(capacity, DEFAULT_TRANSFORM_THRESHOLD))
    }

    /// Creates a new ARC cache from an [`ArcCacheConfig`].
    pub fn from_config(config: ArcCacheConfig) -> Self {
        let half_capacity = config.capacity().get();
        let cap = NonZeroUsize::new(half_capacity * 2).unwrap();
        ArcCache {
            inner: Mutex::new(ArcInner {
                lru_part: ArcLruPart::new(half_capacity, config.transform_threshold()),
                lfu_part: ArcLfuPart::new(half_capacity),
            }),
            cap,
        }
    }

    /// Returns the combined capacity of both halves (`2 * capacity`,
    /// constant across every ghost-driven shift).
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the number of entries currently resident across both halves.
    #[inline]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.lru_part.len() + inner.lfu_part.len()
    }

    /// Returns `true` if neither half holds any entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Hash + Eq + Clone, V: Clone> CachePolicy<K, V> for ArcCache<K, V> {
    /// Inserts or overwrites `key`.
    ///
    /// A ghost hit on either half's ghost list routes the insert to the LRU
    /// half only (the miss is absorbed into the half that was just rewarded
    /// with extra capacity). Otherwise the entry goes into the LRU half,
    /// and is mirrored into the LFU half once it is promoted.
    fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        let ghost_hit = check_ghost_caches(&mut inner, &key);
        if ghost_hit {
            inner.lru_part.put(key, value);
        } else {
            let promoted = inner.lru_part.put(key.clone(), value.clone());
            if promoted {
                inner.lfu_part.put(key, value);
            }
        }
    }

    /// Looks up `key`, consulting the LRU half first.
    ///
    /// A hit that has crossed the promotion threshold is mirrored into the
    /// LFU half. LFU-half hits never further promote.
    fn try_get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        check_ghost_caches(&mut inner, key);

        if let Some((value, should_transform)) = inner.lru_part.get(key) {
            if should_transform {
                inner.lfu_part.put(key.clone(), value.clone());
            }
            return Some(value);
        }

        inner.lfu_part.get(key)
    }
}

impl<K, V> std::fmt::Debug for ArcCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcCache").field("cap", &self.cap).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache<K: Hash + Eq + Clone, V: Clone>(half_capacity: usize) -> ArcCache<K, V> {
        ArcCache::new(NonZeroUsize::new(half_capacity).unwrap())
    }

    #[test]
    fn basic_put_get() {
        let cache = make_cache(2);
        cache.put("a", 1);
        assert_eq!(cache.try_get(&"a"), Some(1));
        assert_eq!(cache.try_get(&"missing"), None);
    }

    #[test]
    fn capacity_is_double_the_per_half_value() {
        let cache: ArcCache<&str, i32> = make_cache(4);
        assert_eq!(cache.cap().get(), 8);
    }

    #[test]
    fn promotion_moves_entry_into_lfu_half() {
        let cache = make_cache(2);
        cache.put("a", 1);
        // transform_threshold defaults to 2: one more access promotes.
        assert_eq!(cache.try_get(&"a"), Some(1));
        assert_eq!(cache.try_get(&"a"), Some(1));

        // Fill the LRU half past "a" many times over; a plain LRU cache
        // would have evicted "a" long ago, but it has been promoted.
        cache.put("b", 2);
        cache.put("c", 3);
        cache.put("d", 4);
        cache.put("e", 5);

        assert_eq!(cache.try_get(&"a"), Some(1));
    }

    #[test]
    fn ghost_hit_shifts_capacity_between_halves() {
        let cache: ArcCache<&str, i32> = ArcCache::from_config(ArcCacheConfig::new(
            NonZeroUsize::new(2).unwrap(),
            2,
        ));
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3); // evicts "a" from the LRU half into its ghost list

        assert_eq!(cache.try_get(&"a"), None);

        // Re-inserting "a" hits the LRU-half ghost, growing the LRU half by
        // one (shrinking the LFU half), and the total stays at 4.
        cache.put("a", 10);
        assert_eq!(cache.cap().get(), 4);
        assert_eq!(cache.try_get(&"a"), Some(10));
    }

    #[test]
    fn zero_half_capacity_is_a_dead_half() {
        let cache: ArcCache<&str, i32> =
            ArcCache::from_config(ArcCacheConfig::new(NonZeroUsize::new(1).unwrap(), 2));
        // Drive the LFU half's capacity down to 0 via repeated LRU ghost hits.
        cache.put("a", 1);
        cache.put("b", 2); // evicts "a" into the LRU ghost
        cache.put("a", 3); // ghost hit: LFU half shrinks to 0, LRU half grows to 2
        assert_eq!(cache.cap().get(), 2);
        assert_eq!(cache.try_get(&"a"), Some(3));
    }
}
