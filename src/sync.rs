//! Thread-safe wrapper around [`LfuCache`].
//!
//! One `parking_lot::Mutex` guards the entire structure (value table,
//! frequency buckets, `min_freq`): even `get` mutates frequency state, so
//! there is no read path to split out, and the bucket-move step spans the
//! index and two buckets atomically. Critical sections are the O(1)
//! operation bodies; callers never block on each other beyond that.
//!
//! The wrapper owns the lock and takes `&self`; share it across threads via
//! `Arc`, injected explicitly into collaborators rather than held as global
//! state:
//!
//! ```
//! use std::sync::Arc;
//! use freqcache::SharedLfuCache;
//!
//! let cache = Arc::new(SharedLfuCache::new(128));
//! let worker = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     worker.insert(7u64, "payload");
//! })
//! .join()
//! .unwrap();
//!
//! assert!(cache.len() <= cache.capacity());
//! ```
//!
//! ## Read-through
//!
//! [`get_or_insert_with`](SharedLfuCache::get_or_insert_with) supports the
//! lookup-service pattern: hit returns the cached value, miss runs the
//! loader *outside* the lock and inserts the result. Two racing callers may
//! both run the loader; the later insert replaces the earlier value, which
//! is harmless for the immutable payloads this cache is meant for. Keeping
//! the cache fresh remains the caller's job: invalidate with
//! [`remove`](SharedLfuCache::remove) on every mutation of the backing
//! record.

use std::hash::Hash;

use parking_lot::Mutex;

use crate::error::InvariantError;
use crate::policy::lfu::LfuCache;

/// `Arc`-shareable LFU cache serializing all operations behind one mutex.
///
/// Values are returned by clone so no lock is held across caller code;
/// wrap large payloads in `Arc` to keep clones cheap.
#[derive(Debug)]
pub struct SharedLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LfuCache<K, V>>,
}

impl<K, V> SharedLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a shared cache holding at most `capacity` entries.
    /// `capacity == 0` disables caching, as for [`LfuCache::new`].
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LfuCache::new(capacity)),
        }
    }

    /// Inserts or replaces, returning the previous value for an existing
    /// key. Counts as an access; evicts per LFU policy at capacity.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Invalidates `key`. Idempotent.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs `f` with exclusive access to the underlying cache. For batch
    /// operations and test assertions that need a consistent snapshot.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut LfuCache<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Validates the underlying cache's invariants under the lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

/// Operations that hand values back to the caller by clone.
impl<K, V> SharedLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Returns a clone of the cached value, counting the hit as an access.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the cached value without counting an access.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Read-through lookup: returns the cached value on a hit; on a miss
    /// runs `load` with the lock released, caches the result, and returns
    /// it.
    ///
    /// ```
    /// use freqcache::SharedLfuCache;
    ///
    /// let cache: SharedLfuCache<u64, String> = SharedLfuCache::new(16);
    /// let value = cache.get_or_insert_with(7, || "fetched".to_string());
    /// assert_eq!(value, "fetched");
    /// assert_eq!(cache.peek(&7).as_deref(), Some("fetched"));
    /// ```
    pub fn get_or_insert_with(&self, key: K, load: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = load();
        self.insert(key, value.clone());
        value
    }

    /// Fallible read-through: like
    /// [`get_or_insert_with`](Self::get_or_insert_with), but a loader error
    /// is propagated and nothing is cached.
    pub fn try_get_or_insert_with<E>(
        &self,
        key: K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = load()?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
