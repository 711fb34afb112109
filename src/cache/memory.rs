//! In-process cache backend.
//!
//! Used when no Redis URL is configured, and as the cache in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStore, ExpiringCache, KeyTtl};
use crate::error::Result;

/// Shared handle to an in-memory [`CacheStore`].
///
/// Cloning is cheap and every clone sees the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying store, shared with the expiry sweeper.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }

    /// Writes a value with no expiry.
    pub async fn set_persistent(&self, key: &str, value: String) {
        self.store.write().await.set(key.to_string(), value, None);
    }
}

#[async_trait]
impl ExpiringCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: expired entries are dropped on read.
        Ok(self.store.write().await.get(key))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value, Some(ttl_secs));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.store.write().await.delete(key))
    }

    async fn flush_all(&self) -> Result<()> {
        self.store.write().await.clear();
        Ok(())
    }

    async fn key_count(&self) -> Result<u64> {
        Ok(self.store.read().await.len() as u64)
    }

    async fn memory_usage(&self) -> Result<String> {
        Ok(format_bytes(self.store.read().await.memory_bytes()))
    }

    async fn sample_keys(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self.store.read().await.keys(limit))
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        Ok(self.store.read().await.ttl(key))
    }
}

/// Formats a byte count the way Redis reports `used_memory_human`.
fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];

    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", value, UNITS[unit])
}
