//! Memory Cache Module
//!
//! In-process read-through layer in front of the backend. Entries are
//! advisory: a hit is only as fresh as the last write or backend read in
//! this process, and a miss says nothing about the backend.
//!
//! Every `set` bumps a per-key write generation. A read that went to the
//! backend only fills memory if no `set` for that key landed in between,
//! so a slow read can never resurrect an overwritten or invalidated value.

use std::collections::HashMap;

use crate::cache::{CacheStats, MemoryEntry};
use crate::key::CacheKey;

// == Memory Cache ==
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<CacheKey, MemoryEntry>,
    /// Writes seen per key; one small counter per key this process has set
    generations: HashMap<CacheKey, u64>,
    stats: CacheStats,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Mirrors a value with the same expiry as its persisted record.
    ///
    /// `None` drops the key, so an invalidated value is never served.
    pub fn set(&mut self, key: CacheKey, value: Option<String>, expires_at: Option<u64>) {
        *self.generations.entry(key.clone()).or_default() += 1;
        match value {
            Some(value) => {
                self.entries.insert(key, MemoryEntry::new(value, expires_at));
            }
            None => {
                self.entries.remove(&key);
            }
        }
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &CacheKey) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Write Generation ==
    /// Number of `set` calls seen for `key`. Capture it before a backend
    /// read and hand it back to `fill`.
    pub fn generation(&self, key: &CacheKey) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }

    // == Fill ==
    /// Caches a value read from the backend, unless `key` was set since
    /// `observed` was taken. Returns whether the value was cached.
    pub fn fill(
        &mut self,
        key: CacheKey,
        value: String,
        expires_at: Option<u64>,
        observed: u64,
    ) -> bool {
        if self.generation(&key) != observed {
            return false;
        }
        self.entries.insert(key, MemoryEntry::new(value, expires_at));
        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
