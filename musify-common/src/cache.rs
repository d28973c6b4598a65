//! Bounded, time-expiring in-memory cache
//!
//! One [`TtlCache`] is instantiated per upstream dependency, each with its own
//! TTL and capacity. Entries expire a fixed time after they were written
//! (expire-after-write) and are evicted lazily on lookup. When the cache is
//! full, inserting a new key evicts the least recently inserted entry.
//!
//! The cache is safe to share between concurrent requests; callers never
//! need their own locking.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Expiry and size policy for one cache instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Time after insertion at which an entry is treated as absent
    pub ttl: Duration,
    /// Maximum number of live entries
    pub max_entries: usize,
}

impl CacheSettings {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self { ttl, max_entries }
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Thread-safe key/value cache with write-time expiry and a bounded size
pub struct TtlCache<K, V> {
    entries: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create an empty cache. A capacity of zero is raised to one.
    pub fn new(settings: CacheSettings) -> Self {
        let capacity = NonZeroUsize::new(settings.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: settings.ttl,
        }
    }

    /// Look up a live entry.
    ///
    /// Lookups do not refresh an entry's position: eviction order follows
    /// insertion order. An expired entry is removed and reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();

        match entries.peek(key) {
            None => return None,
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.value.clone()),
            Some(_) => {}
        }

        entries.pop(key);
        None
    }

    /// Insert or overwrite an entry, resetting its expiry clock.
    pub fn put(&self, key: K, value: V) {
        let entry = Entry {
            value,
            inserted_at: Instant::now(),
        };
        self.lock().put(key, entry);
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Entries are only ever replaced whole, so a poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, LruCache<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
