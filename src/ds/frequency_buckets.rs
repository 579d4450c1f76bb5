//! Frequency ledger for O(1) LFU tracking with recency tie-breaking.
//!
//! Tracks how often each key has been touched and keeps keys grouped into
//! per-frequency buckets so the least-frequently-used key can be found in
//! O(1). Within a bucket, members are ordered by recency of last touch; the
//! tail (least recently touched) is the eviction end.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        FrequencyLedger<K>                            │
//! │                                                                      │
//! │  index: FxHashMap<K, SlotId>      entries: SlotArena<Entry<K>>       │
//! │      "user:7"  → id_0                 id_0: freq=2, prev/next        │
//! │      "user:3"  → id_1                 id_1: freq=1, prev/next        │
//! │      "user:9"  → id_2                 id_2: freq=1, prev/next        │
//! │                                                                      │
//! │  buckets: FxHashMap<u64, Bucket>   (linked in ascending freq order)  │
//! │                                                                      │
//! │  min_freq = 1                                                        │
//! │      │                                                               │
//! │      ▼                                                               │
//! │  freq=1: head ─► [id_2] ◄─► [id_1] ◄─ tail   ◄── evict from tail     │
//! │            (most recent)   (least recent)                            │
//! │  freq=2: head ─► [id_0] ◄─ tail                                      │
//! │                                                                      │
//! │  bucket links: freq=1 ──next──► freq=2,  freq=2 ──prev──► freq=1     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Operation   | Time | Notes                                      |
//! |-------------|------|--------------------------------------------|
//! | `insert`    | O(1) | New key starts at freq=1, recency head     |
//! | `touch`     | O(1) | freq += 1, moved to head of new bucket     |
//! | `remove`    | O(1) | Unlink, repair bucket chain and `min_freq` |
//! | `pop_min`   | O(1) | Tail of the `min_freq` bucket              |
//! | `peek_min`  | O(1) | Same candidate, not removed                |
//! | `frequency` | O(1) | Current count for a key                    |
//!
//! Entry links are `SlotId`s into a [`SlotArena`], never references, so an
//! entry can be spliced out of the middle of a bucket without aliased
//! mutable borrows. A bucket with zero members is removed from the chain
//! immediately; `min_freq` is 0 only when the ledger is empty.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Entry<K> {
    // Link fields first: touched on every operation.
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
}

#[derive(Debug)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev_freq: Option<u64>,
    next_freq: Option<u64>,
}

/// O(1) LFU metadata tracker with least-recently-touched tie-breaking.
///
/// Keys are grouped into frequency buckets; buckets form a doubly-linked
/// chain in ascending frequency order so the minimum can be maintained in
/// O(1) as buckets empty. Values live elsewhere — the ledger tracks only
/// keys and their access counts.
///
/// # Example
///
/// ```
/// use freqcache::ds::FrequencyLedger;
///
/// let mut ledger = FrequencyLedger::new();
/// ledger.insert("a");
/// ledger.insert("b");
/// ledger.touch(&"a"); // "a" now at freq=2
///
/// assert_eq!(ledger.frequency(&"a"), Some(2));
/// assert_eq!(ledger.frequency(&"b"), Some(1));
/// assert_eq!(ledger.min_freq(), Some(1));
///
/// // "b" is the only key at the minimum frequency.
/// assert_eq!(ledger.pop_min(), Some(("b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyLedger<K> {
    entries: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64, // 0 iff empty
}

impl<K> FrequencyLedger<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty ledger with space reserved for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current frequency for `key`, if tracked.
    #[inline]
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Returns the smallest frequency present, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Starts tracking a new key at frequency 1 (recency head of bucket 1).
    ///
    /// Returns `false` and changes nothing if the key is already tracked;
    /// use [`touch`] to count an access on an existing key.
    ///
    /// [`touch`]: Self::touch
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key: key.clone(),
        });
        self.index.insert(key, id);
        let next_hint = if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        };
        self.push_head(id, 1, None, next_hint);
        true
    }

    /// Counts an access: increments the key's frequency and moves it to the
    /// recency head of its new bucket. Returns the new frequency, or `None`
    /// if the key is not tracked.
    ///
    /// ```
    /// use freqcache::ds::FrequencyLedger;
    ///
    /// let mut ledger = FrequencyLedger::new();
    /// ledger.insert("k");
    /// assert_eq!(ledger.touch(&"k"), Some(2));
    /// assert_eq!(ledger.touch(&"missing"), None);
    /// ```
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let old_freq = self
            .entries
            .get(id)
            .expect("indexed entry missing from arena")
            .freq;
        let new_freq = old_freq.saturating_add(1);

        if new_freq == old_freq {
            // Saturated at u64::MAX: refresh recency only.
            let bucket = self.buckets.get(&old_freq).expect("bucket missing");
            if bucket.head != Some(id) {
                // At least two members, so the bucket survives the unlink.
                self.unlink(id);
                self.push_head(id, old_freq, None, None);
            }
            return Some(new_freq);
        }

        let (bucket_prev, bucket_next, single) = {
            let bucket = self.buckets.get(&old_freq).expect("bucket missing");
            (bucket.prev_freq, bucket.next_freq, bucket.head == bucket.tail)
        };
        self.unlink(id);

        // Neighbour hints for a freshly created old_freq+1 bucket: if the old
        // bucket survived it is the predecessor; otherwise the new bucket
        // takes over the old one's position in the chain.
        let prev_hint = if single { bucket_prev } else { Some(old_freq) };
        self.push_head(id, new_freq, prev_hint, bucket_next);
        Some(new_freq)
    }

    /// Stops tracking `key`, returning its frequency at removal.
    /// No-op (returns `None`) for untracked keys.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        let freq = self.unlink(id);
        self.entries.remove(id);
        Some(freq)
    }

    /// Removes and returns the eviction candidate: the least recently
    /// touched key at the minimum frequency.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.tail?;
        let freq = self.unlink(id);
        let entry = self
            .entries
            .remove(id)
            .expect("indexed entry missing from arena");
        self.index.remove(&entry.key);
        Some((entry.key, freq))
    }

    /// Peeks the eviction candidate without removing it.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.tail?;
        let entry = self.entries.get(id)?;
        Some((&entry.key, entry.freq))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Unlinks `id` from its bucket's member list. If the bucket empties it
    /// is dropped from the chain and `min_freq` is repaired. Returns the
    /// frequency the entry was filed under.
    fn unlink(&mut self, id: SlotId) -> u64 {
        let (prev, next, freq) = {
            let entry = self
                .entries
                .get(id)
                .expect("indexed entry missing from arena");
            (entry.prev, entry.next, entry.freq)
        };

        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.entries.get_mut(prev_id) {
                    entry.next = next;
                }
            }
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.head = next;
                }
            }
        }
        match next {
            Some(next_id) => {
                if let Some(entry) = self.entries.get_mut(next_id) {
                    entry.prev = prev;
                }
            }
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.tail = prev;
                }
            }
        }
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }

        let emptied = self
            .buckets
            .get(&freq)
            .is_some_and(|bucket| bucket.head.is_none());
        if emptied {
            self.drop_bucket(freq);
        }
        freq
    }

    /// Removes an empty bucket from the chain, patching neighbour links and
    /// advancing `min_freq` when the minimum bucket disappears.
    fn drop_bucket(&mut self, freq: u64) {
        let Some(bucket) = self.buckets.remove(&freq) else {
            return;
        };
        if let Some(prev) = bucket.prev_freq {
            if let Some(neighbour) = self.buckets.get_mut(&prev) {
                neighbour.next_freq = bucket.next_freq;
            }
        }
        if let Some(next) = bucket.next_freq {
            if let Some(neighbour) = self.buckets.get_mut(&next) {
                neighbour.prev_freq = bucket.prev_freq;
            }
        }
        if self.min_freq == freq {
            self.min_freq = bucket.next_freq.unwrap_or(0);
        }
    }

    /// Links `id` at the recency head of the bucket for `freq`, creating the
    /// bucket (spliced between `prev_hint` and `next_hint`) if absent.
    fn push_head(&mut self, id: SlotId, freq: u64, prev_hint: Option<u64>, next_hint: Option<u64>) {
        if !self.buckets.contains_key(&freq) {
            self.buckets.insert(
                freq,
                Bucket {
                    head: None,
                    tail: None,
                    prev_freq: prev_hint,
                    next_freq: next_hint,
                },
            );
            if let Some(prev) = prev_hint {
                if let Some(neighbour) = self.buckets.get_mut(&prev) {
                    neighbour.next_freq = Some(freq);
                }
            }
            if let Some(next) = next_hint {
                if let Some(neighbour) = self.buckets.get_mut(&next) {
                    neighbour.prev_freq = Some(freq);
                }
            }
            if prev_hint.is_none() {
                self.min_freq = freq;
            }
        }

        let old_head = self.buckets.get(&freq).expect("bucket just ensured").head;
        {
            let entry = self
                .entries
                .get_mut(id)
                .expect("indexed entry missing from arena");
            entry.freq = freq;
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(head_id) = old_head {
            if let Some(entry) = self.entries.get_mut(head_id) {
                entry.prev = Some(id);
            }
        }
        let bucket = self.buckets.get_mut(&freq).expect("bucket just ensured");
        bucket.head = Some(id);
        if bucket.tail.is_none() {
            bucket.tail = Some(id);
        }
    }

    /// Validates the ledger's structural invariants: every bucket non-empty,
    /// the chain ascending and reachable from `min_freq`, member frequencies
    /// matching their bucket, and index/arena/bucket sizes agreeing.
    ///
    /// O(n); intended for tests and debugging, not the hot path.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.entries.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "arena has {} entries but index has {}",
                self.entries.len(),
                self.index.len()
            )));
        }
        if self.is_empty() {
            if self.min_freq != 0 {
                return Err(InvariantError::new("min_freq set on empty ledger"));
            }
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("buckets remain on empty ledger"));
            }
            return Ok(());
        }
        if self.min_freq == 0 {
            return Err(InvariantError::new("min_freq unset on non-empty ledger"));
        }

        let mut members_seen = 0usize;
        let mut buckets_seen = 0usize;
        let mut previous: Option<u64> = None;
        let mut current = Some(self.min_freq);
        while let Some(freq) = current {
            let bucket = self.buckets.get(&freq).ok_or_else(|| {
                InvariantError::new(format!("bucket chain names missing bucket {freq}"))
            })?;
            if bucket.prev_freq != previous {
                return Err(InvariantError::new(format!(
                    "bucket {freq} has prev_freq {:?}, expected {:?}",
                    bucket.prev_freq, previous
                )));
            }
            if let Some(prev) = previous {
                if freq <= prev {
                    return Err(InvariantError::new(format!(
                        "bucket chain not ascending: {prev} -> {freq}"
                    )));
                }
            }

            let mut node = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = node {
                let entry = self.entries.get(id).ok_or_else(|| {
                    InvariantError::new(format!("bucket {freq} links vacant slot"))
                })?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry at freq {} filed in bucket {freq}",
                        entry.freq
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new(format!(
                        "broken back-link in bucket {freq}"
                    )));
                }
                last = Some(id);
                node = entry.next;
                count += 1;
                if count > self.entries.len() {
                    return Err(InvariantError::new(format!("cycle in bucket {freq}")));
                }
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!("stale tail in bucket {freq}")));
            }
            if count == 0 {
                return Err(InvariantError::new(format!("empty bucket {freq} retained")));
            }

            members_seen += count;
            buckets_seen += 1;
            if buckets_seen > self.buckets.len() {
                return Err(InvariantError::new("cycle in bucket chain"));
            }
            previous = Some(freq);
            current = bucket.next_freq;
        }

        if buckets_seen != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "{} buckets unreachable from min_freq",
                self.buckets.len() - buckets_seen
            )));
        }
        if members_seen != self.entries.len() {
            return Err(InvariantError::new(format!(
                "bucket membership covers {members_seen} of {} entries",
                self.entries.len()
            )));
        }
        Ok(())
    }
}

impl<K> Default for FrequencyLedger<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid<K: Eq + std::hash::Hash + Clone + std::fmt::Debug>(
        ledger: &FrequencyLedger<K>,
    ) {
        if let Err(err) = ledger.check_invariants() {
            panic!("invariant violated: {err}");
        }
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_starts_at_frequency_one() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");

            assert_eq!(ledger.len(), 2);
            assert_eq!(ledger.frequency(&"a"), Some(1));
            assert_eq!(ledger.frequency(&"b"), Some(1));
            assert_eq!(ledger.min_freq(), Some(1));
            assert_valid(&ledger);
        }

        #[test]
        fn touch_increments_and_tracks_min() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");

            assert_eq!(ledger.touch(&"a"), Some(2));
            assert_eq!(ledger.touch(&"a"), Some(3));
            assert_eq!(ledger.frequency(&"a"), Some(3));
            assert_eq!(ledger.min_freq(), Some(1));
            assert_valid(&ledger);

            // Raising the last freq=1 key advances the minimum.
            assert_eq!(ledger.touch(&"b"), Some(2));
            assert_eq!(ledger.min_freq(), Some(2));
            assert_valid(&ledger);
        }

        #[test]
        fn duplicate_insert_is_rejected() {
            let mut ledger = FrequencyLedger::new();
            assert!(ledger.insert("a"));
            ledger.touch(&"a");

            // A second insert of the same key must change nothing: no
            // frequency reset, no orphaned list node, no phantom length.
            assert!(!ledger.insert("a"));
            assert_eq!(ledger.len(), 1);
            assert_eq!(ledger.frequency(&"a"), Some(2));
            assert_valid(&ledger);

            assert_eq!(ledger.pop_min(), Some(("a", 2)));
            assert_eq!(ledger.pop_min(), None);
            assert_valid(&ledger);
        }

        #[test]
        fn touch_missing_key_is_none() {
            let mut ledger: FrequencyLedger<&str> = FrequencyLedger::new();
            assert_eq!(ledger.touch(&"ghost"), None);
            assert!(ledger.is_empty());
            assert_valid(&ledger);
        }

        #[test]
        fn frequency_and_contains_are_read_only() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");

            assert!(ledger.contains(&"a"));
            assert!(!ledger.contains(&"b"));
            assert_eq!(ledger.frequency(&"a"), Some(1));
            // Queries must not count as touches.
            assert_eq!(ledger.frequency(&"a"), Some(1));
            assert_valid(&ledger);
        }
    }

    mod eviction_order {
        use super::*;

        #[test]
        fn pop_min_prefers_lowest_frequency() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("cold");
            ledger.insert("hot");
            ledger.touch(&"hot");
            ledger.touch(&"hot");

            assert_eq!(ledger.pop_min(), Some(("cold", 1)));
            assert_eq!(ledger.pop_min(), Some(("hot", 3)));
            assert_eq!(ledger.pop_min(), None);
            assert_eq!(ledger.min_freq(), None);
            assert_valid(&ledger);
        }

        #[test]
        fn ties_break_by_least_recent_touch() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("first");
            ledger.insert("second");
            ledger.insert("third");

            // All at freq=1; "first" is the stalest.
            assert_eq!(ledger.peek_min(), Some((&"first", 1)));
            assert_eq!(ledger.pop_min(), Some(("first", 1)));
            assert_eq!(ledger.pop_min(), Some(("second", 1)));
            assert_valid(&ledger);
        }

        #[test]
        fn touch_refreshes_recency_within_tie() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");
            ledger.touch(&"a");
            ledger.touch(&"b");

            // Both at freq=2; "a" was touched first so it is now stalest.
            assert_eq!(ledger.pop_min(), Some(("a", 2)));
            assert_valid(&ledger);
        }

        #[test]
        fn peek_min_does_not_remove() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            assert_eq!(ledger.peek_min(), Some((&"a", 1)));
            assert_eq!(ledger.len(), 1);
            assert_valid(&ledger);
        }
    }

    mod bucket_maintenance {
        use super::*;

        #[test]
        fn remove_repairs_min_freq() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("low");
            ledger.insert("high");
            ledger.touch(&"high");
            ledger.touch(&"high");

            assert_eq!(ledger.remove(&"low"), Some(1));
            assert_eq!(ledger.min_freq(), Some(3));
            assert_valid(&ledger);

            assert_eq!(ledger.remove(&"low"), None);
            assert_valid(&ledger);
        }

        #[test]
        fn remove_middle_of_bucket() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");
            ledger.insert("c");

            // "b" sits mid-list in the freq=1 bucket.
            assert_eq!(ledger.remove(&"b"), Some(1));
            assert_eq!(ledger.len(), 2);
            assert_eq!(ledger.pop_min(), Some(("a", 1)));
            assert_eq!(ledger.pop_min(), Some(("c", 1)));
            assert_valid(&ledger);
        }

        #[test]
        fn chain_skips_gaps_between_frequencies() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");
            for _ in 0..4 {
                ledger.touch(&"a");
            }
            // Buckets now at 1 and 5 with a gap between.
            assert_valid(&ledger);

            assert_eq!(ledger.pop_min(), Some(("b", 1)));
            assert_eq!(ledger.min_freq(), Some(5));
            assert_valid(&ledger);
        }

        #[test]
        fn reinsert_after_remove_starts_cold() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("k");
            ledger.touch(&"k");
            ledger.touch(&"k");
            assert_eq!(ledger.remove(&"k"), Some(3));

            ledger.insert("k");
            assert_eq!(ledger.frequency(&"k"), Some(1));
            assert_eq!(ledger.min_freq(), Some(1));
            assert_valid(&ledger);
        }

        #[test]
        fn clear_resets_all_state() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.touch(&"a");
            ledger.clear();

            assert!(ledger.is_empty());
            assert_eq!(ledger.min_freq(), None);
            assert_eq!(ledger.frequency(&"a"), None);
            assert_valid(&ledger);
        }

        #[test]
        fn saturated_frequency_still_refreshes_recency() {
            let mut ledger = FrequencyLedger::new();
            ledger.insert("a");
            ledger.insert("b");

            // Pin both entries at the frequency ceiling by relocating the
            // freq=1 bucket; only reachable through private state, since
            // touching a key u64::MAX times is not practical.
            let bucket = ledger.buckets.remove(&1).unwrap();
            ledger.buckets.insert(u64::MAX, bucket);
            ledger.min_freq = u64::MAX;
            let ids: Vec<_> = ledger.index.values().copied().collect();
            for id in ids {
                ledger.entries.get_mut(id).unwrap().freq = u64::MAX;
            }
            assert_valid(&ledger);
            assert_eq!(ledger.peek_min(), Some((&"a", u64::MAX)));

            // "a" is the tail; a saturated touch must not overflow, and must
            // still move it to the recency head.
            assert_eq!(ledger.touch(&"a"), Some(u64::MAX));
            assert_eq!(ledger.frequency(&"a"), Some(u64::MAX));
            assert_eq!(ledger.peek_min(), Some((&"b", u64::MAX)));
            assert_valid(&ledger);

            // Touching the entry already at the head is a no-op.
            assert_eq!(ledger.touch(&"a"), Some(u64::MAX));
            assert_eq!(ledger.peek_min(), Some((&"b", u64::MAX)));
            assert_valid(&ledger);
        }

        #[test]
        fn interleaved_operations_keep_invariants() {
            let mut ledger = FrequencyLedger::new();
            for i in 0..8u64 {
                ledger.insert(i);
                assert_valid(&ledger);
            }
            for round in 0..4u64 {
                for i in 0..8u64 {
                    if (i + round) % 3 == 0 {
                        ledger.touch(&i);
                    }
                    assert_valid(&ledger);
                }
                if let Some((key, _)) = ledger.pop_min() {
                    assert!(!ledger.contains(&key));
                }
                assert_valid(&ledger);
            }
        }
    }
}
