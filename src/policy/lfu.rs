//! Bounded LFU cache with recency tie-breaking.
//!
//! Evicts the least frequently accessed entry when a new key arrives at
//! capacity; ties at the minimum frequency are broken by evicting the least
//! recently touched member, never arbitrarily.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       LfuCache<K, V>                        │
//! │                                                             │
//! │   values: FxHashMap<K, V>        (payloads, opaque)         │
//! │   ledger: FrequencyLedger<K>     (freq buckets + min_freq)  │
//! │   capacity: usize                (fixed at construction)    │
//! │                                                             │
//! │   get hit    → ledger.touch  → freq+1, moved to MRU head    │
//! │   get miss   → nothing changes                              │
//! │   insert new → evict ledger.pop_min() if at capacity,       │
//! │                then start at freq=1                         │
//! │   insert old → replace value, counts as an access           │
//! │   remove     → invalidate, idempotent                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All three operations are amortized O(1) in time and O(1) in extra space,
//! independent of capacity; victim selection never scans.
//!
//! ## Capacity
//!
//! Capacity is fixed at construction. `new(0)` is a supported configuration
//! that disables caching: every insert is a no-op and every get misses. The
//! `usize` parameter makes a negative capacity unrepresentable, so
//! construction cannot fail.
//!
//! ## Staleness
//!
//! The cache guarantees internal consistency only. It cannot know when a
//! cached value diverges from the backing store; collaborators must `remove`
//! (or re-`insert`) the key on every mutation of the authoritative record.
//!
//! ## Thread safety
//!
//! `LfuCache` is not thread-safe; even `get` mutates frequency state. Use
//! [`SharedLfuCache`](crate::sync::SharedLfuCache) for concurrent access.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::FrequencyLedger;
use crate::error::InvariantError;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache, ReadOnlyCache};

/// LFU cache: bounded key-value map evicting the least frequently used
/// entry, with least-recently-touched tie-breaking.
///
/// # Example
///
/// ```
/// use freqcache::LfuCache;
///
/// let mut cache = LfuCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a"); // "a" now at freq=2
///
/// cache.insert("c", 3); // evicts "b", the least frequent
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(&1));
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    values: FxHashMap<K, V>,
    ledger: FrequencyLedger<K>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// `capacity == 0` disables caching rather than erroring, so callers can
    /// turn the cache off by configuration.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ledger: FrequencyLedger::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the cached value for `key`, counting the hit as an access.
    ///
    /// A miss returns `None` and mutates no frequency bookkeeping.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.ledger.touch(key);
        self.values.get(key)
    }

    /// Inserts or replaces the value for `key`, returning the previous value
    /// for an existing key.
    ///
    /// Replacing an existing key counts as an access. A new key starts at
    /// frequency 1; if the cache is full the eviction candidate (least
    /// recently touched entry at the minimum frequency) is removed first.
    /// With capacity 0 this is a no-op.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.values.contains_key(&key) {
            self.ledger.touch(&key);
            return self.values.insert(key, value);
        }
        if self.capacity == 0 {
            return None;
        }
        if self.values.len() >= self.capacity {
            if let Some((victim, _)) = self.ledger.pop_min() {
                self.values.remove(&victim);
            }
        }
        self.ledger.insert(key.clone());
        self.values.insert(key, value);
        None
    }

    /// Invalidates `key`, returning its value. Idempotent: a second remove
    /// of the same key is a no-op. After `remove(k)`, `get(k)` misses and a
    /// later `insert(k, _)` starts over at frequency 1.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.ledger.remove(key);
        self.values.remove(key)
    }

    /// Returns the cached value without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Returns `true` if `key` is cached. Does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// Current access count for `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.ledger.frequency(key)
    }

    /// Peeks the eviction candidate without removing it.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (key, _) = self.ledger.peek_min()?;
        let value = self.values.get(key)?;
        Some((key, value))
    }

    /// Removes and returns the eviction candidate.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (key, _) = self.ledger.pop_min()?;
        let value = self.values.remove(&key)?;
        Some((key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.ledger.clear();
    }

    /// Validates structural invariants: size within capacity, value table
    /// and frequency ledger tracking the same key set, and the ledger's
    /// bucket-chain invariants. O(n); for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.values.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.values.len(),
                self.capacity
            )));
        }
        if self.values.len() != self.ledger.len() {
            return Err(InvariantError::new(format!(
                "value table has {} keys but ledger tracks {}",
                self.values.len(),
                self.ledger.len()
            )));
        }
        for key in self.values.keys() {
            if !self.ledger.contains(key) {
                return Err(InvariantError::new("cached key missing from ledger"));
            }
        }
        self.ledger.check_invariants()
    }
}

impl<K, V> ReadOnlyCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn peek(&self, key: &K) -> Option<&V> {
        LfuCache::peek(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LfuCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn frequency(&self, key: &K) -> Option<u64> {
        LfuCache::frequency(self, key)
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        LfuCache::peek_lfu(self)
    }

    fn pop_lfu(&mut self) -> Option<(K, V)> {
        LfuCache::pop_lfu(self)
    }
}
