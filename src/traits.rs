//! Cache trait hierarchy.
//!
//! A slim seam between the LFU policy and its collaborators, so callers can
//! be written against capabilities rather than the concrete cache type:
//!
//! ```text
//!   ReadOnlyCache<K, V>        peek, contains, len, is_empty, capacity
//!        │
//!        ▼
//!   CoreCache<K, V>            insert, get, clear
//!        │
//!        ▼
//!   MutableCache<K, V>         remove (invalidation)
//!        │
//!        ▼
//!   LfuCacheTrait<K, V>        frequency, peek_lfu, pop_lfu
//! ```
//!
//! `get` takes `&mut self` on purpose: a hit counts as an access and moves
//! the entry between frequency buckets, so there is no shared read path.

/// Read-only cache queries. None of these count as an access.
pub trait ReadOnlyCache<K, V> {
    /// Returns the cached value without touching frequency bookkeeping.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is cached. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries; fixed at construction.
    fn capacity(&self) -> usize;
}

/// Core operations every cache supports.
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or replaces, returning the previous value for an existing
    /// key. May evict per the cache's policy when a new key arrives at
    /// capacity. Both the insert of a new key and the replacement of an
    /// existing one count as an access.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the cached value and counts the hit as an access.
    /// A miss returns `None` and mutates nothing.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Drops every entry.
    fn clear(&mut self);
}

/// Caches supporting arbitrary key removal (invalidation).
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes the entry for `key`, returning its value. Idempotent: absent
    /// keys return `None` and nothing changes.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Frequency introspection and manual eviction for LFU caches.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Current access count for `key`. Does not count as an access.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Peeks the eviction candidate: least recently touched entry at the
    /// minimum frequency.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Removes and returns the eviction candidate.
    fn pop_lfu(&mut self) -> Option<(K, V)>;
}
