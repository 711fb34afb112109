//! Expiring cache client abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Remaining lifetime of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// Key expires in this many whole seconds
    Expiring(u64),
    /// Key exists without an expiry
    Persistent,
    /// Key is absent or already expired
    Missing,
}

impl KeyTtl {
    /// Seconds left for a key that is still counting down, if any remain.
    pub fn positive_secs(&self) -> Option<u64> {
        match self {
            KeyTtl::Expiring(secs) if *secs > 0 => Some(*secs),
            _ => None,
        }
    }
}

/// Key-value cache with per-key TTL, the contract the coordinator relies on.
///
/// Implementations must be safe to share across concurrent requests. Any
/// backend failure is reported as `BridgeError::CacheUnavailable`.
#[async_trait]
pub trait ExpiringCache: Send + Sync {
    /// Reads a live value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value that expires after `ttl_secs` seconds, replacing any
    /// previous value and TTL.
    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<()>;

    /// Deletes a key. Returns whether a live key was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Purges every key held by the backend.
    async fn flush_all(&self) -> Result<()>;

    /// Number of keys currently held.
    async fn key_count(&self) -> Result<u64>;

    /// Backend-reported memory usage, in the backend's own format.
    async fn memory_usage(&self) -> Result<String>;

    /// Up to `limit` keys in backend enumeration order.
    async fn sample_keys(&self, limit: usize) -> Result<Vec<String>>;

    /// Remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> Result<KeyTtl>;

    /// Releases connections. Called once by the composition root at shutdown.
    async fn close(&self) {}
}
