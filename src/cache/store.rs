//! Cache Store Module
//!
//! Bounded blob cache: a key index over a CLOCK ring, limited both by entry
//! count and by aggregate bytes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, ClockRing};
use crate::error::{CacheError, Result};

// == Admission ==
/// Outcome of [`BlobCache::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The value is cached.
    Stored,
    /// The value alone exceeds the memory limit and was not cached. Any
    /// previous value under the same key has been dropped.
    Rejected,
}

// == Blob Cache ==
/// In-memory blob cache with CLOCK eviction under two limits.
///
/// All state sits behind a single mutex; every operation holds it for its
/// full duration and never performs I/O while holding it.
#[derive(Debug)]
pub struct BlobCache {
    /// Maximum number of entries
    capacity: usize,
    /// Maximum aggregate bytes
    mem_limit: u64,
    state: Mutex<CacheState>,
}

#[derive(Debug)]
struct CacheState {
    /// Key -> ring slot
    index: HashMap<String, usize>,
    ring: ClockRing,
    /// Aggregate bytes of all cached values
    mem_used: u64,
    stats: CacheStats,
}

impl BlobCache {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries and `mem_limit`
    /// bytes.
    ///
    /// A `mem_limit` of 0 is accepted; only empty blobs can then be cached.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `capacity` is 0.
    pub fn new(capacity: usize, mem_limit: u64) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            mem_limit,
            state: Mutex::new(CacheState {
                index: HashMap::with_capacity(capacity),
                ring: ClockRing::with_capacity(capacity),
                mem_used: 0,
                stats: CacheStats::new(),
            }),
        })
    }

    // == Get ==
    /// Looks up a blob and marks it referenced on a hit.
    ///
    /// Never evicts.
    pub fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        self.lock().get(key)
    }

    // == Set ==
    /// Inserts or replaces a blob, evicting until both limits hold.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Arc<[u8]>>) -> Admission {
        self.lock()
            .set(key.into(), value.into(), self.capacity, self.mem_limit)
    }

    // == Invalidate ==
    /// Drops the cached copy of `key`, if any, so the next read goes to the
    /// authoritative store. Returns whether an entry was removed.
    pub(crate) fn invalidate(&self, key: &str) -> bool {
        self.lock().drop_key(key)
    }

    /// Checks presence without touching the reference bit.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().index.contains_key(key)
    }

    // == Stats ==
    /// Returns a snapshot of counters and usage.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.index.len();
        stats.mem_used = state.mem_used;
        stats.capacity = self.capacity;
        stats.mem_limit = self.mem_limit;
        stats
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current aggregate bytes.
    pub fn mem_used(&self) -> u64 {
        self.lock().mem_used
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mem_limit(&self) -> u64 {
        self.mem_limit
    }

    // Every mutation leaves the state consistent before anything that can
    // panic, so a poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Verifies index/ring agreement and both limits.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let state = self.lock();

        assert!(state.index.len() <= self.capacity, "entry count over capacity");
        assert!(state.mem_used <= self.mem_limit, "bytes over memory limit");
        assert_eq!(state.index.len(), state.ring.len(), "index and ring disagree");

        let mut total = 0;
        for (idx, entry) in state.ring.iter() {
            assert_eq!(state.index.get(&entry.key), Some(&idx), "slot not indexed");
            assert_eq!(entry.size, entry.value.len() as u64, "stale size");
            total += entry.size;
        }
        assert_eq!(total, state.mem_used, "byte accounting drift");
    }
}

impl CacheState {
    fn get(&mut self, key: &str) -> Option<Arc<[u8]>> {
        let hit = self
            .index
            .get(key)
            .and_then(|&idx| self.ring.get_mut(idx))
            .map(|entry| {
                entry.touch();
                Arc::clone(&entry.value)
            });

        match hit {
            Some(_) => {
                self.stats.record_hit();
                trace!(key, "cache hit");
            }
            None => {
                self.stats.record_miss();
                trace!(key, "cache miss");
            }
        }
        hit
    }

    fn set(&mut self, key: String, value: Arc<[u8]>, capacity: usize, mem_limit: u64) -> Admission {
        let size = value.len() as u64;
        trace!(key = %key, size, "cache set");

        if size > mem_limit {
            // Drop any stale copy so readers fall through to the store.
            self.drop_key(&key);
            self.stats.record_rejection();
            debug!(key = %key, size, mem_limit, "blob larger than cache memory limit, not cached");
            return Admission::Rejected;
        }

        // Update in place
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.ring.get_mut(idx) {
                let old_size = entry.replace(value);
                self.mem_used = self.mem_used - old_size + size;
                trace!(key = %key, mem_used = self.mem_used, "cache updated");
            }
            self.evict_to_limit(mem_limit);
            return Admission::Stored;
        }

        // Make room by count and by bytes. An empty cache satisfies both
        // checks since size <= mem_limit here.
        while self.index.len() >= capacity || self.mem_used + size > mem_limit {
            if !self.evict_one() {
                break;
            }
        }

        let Some(idx) = self.ring.insert(CacheEntry::new(key.clone(), value)) else {
            return Admission::Rejected;
        };
        self.index.insert(key, idx);
        self.mem_used += size;
        trace!(slot = idx, mem_used = self.mem_used, "cache inserted");

        Admission::Stored
    }

    fn drop_key(&mut self, key: &str) -> bool {
        let Some(stale) = self.index.remove(key).and_then(|idx| self.ring.take(idx)) else {
            return false;
        };
        self.mem_used -= stale.size;
        self.stats.record_eviction();
        trace!(key, size = stale.size, mem_used = self.mem_used, "cache invalidate");
        true
    }

    fn evict_to_limit(&mut self, mem_limit: u64) {
        while self.mem_used > mem_limit {
            if !self.evict_one() {
                break;
            }
        }
    }

    fn evict_one(&mut self) -> bool {
        match self.ring.evict() {
            Some(victim) => {
                self.index.remove(&victim.key);
                self.mem_used -= victim.size;
                self.stats.record_eviction();
                trace!(key = %victim.key, size = victim.size, mem_used = self.mem_used, "cache evict");
                true
            }
            None => false,
        }
    }
}
