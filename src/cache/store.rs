//! Cache Store Module
//!
//! Synchronous TTL map backing the in-memory cache backend.

use std::collections::HashMap;
use std::time::Instant;

use crate::cache::{CacheEntry, KeyTtl};

// == Cache Store ==
/// Key-value storage with per-key TTL expiration.
///
/// Expired entries are dropped lazily on access and in bulk by
/// [`CacheStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// If the key already exists, the value is overwritten and TTL is reset.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) {
        let entry = match ttl {
            Some(secs) => CacheEntry::expiring(value, secs),
            None => CacheEntry::persistent(value),
        };
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or expired. Expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_live() => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries
            .remove(key)
            .is_some_and(|entry| entry.is_live())
    }

    // == Clear ==
    /// Removes every entry. Returns the number of entries dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == TTL ==
    /// Reports the remaining lifetime of a key.
    pub fn ttl(&self, key: &str) -> KeyTtl {
        self.entries
            .get(key)
            .map_or(KeyTtl::Missing, |entry| entry.ttl_at(Instant::now()))
    }

    // == Keys ==
    /// Returns up to `limit` live keys in map iteration order.
    pub fn keys(&self, limit: usize) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_live_at(now))
            .map(|(key, _)| key.clone())
            .take(limit)
            .collect()
    }

    // == Memory ==
    /// Approximate bytes held by live keys and values.
    pub fn memory_bytes(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_live_at(now))
            .map(|(key, entry)| key.len() + entry.size_hint())
            .sum()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| entry.is_live_at(now))
            .count()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
