//! Cache-aside coordinator
//!
//! Reads prefer the cache and fall back to the backing store, populating the
//! cache on a miss. Creating a record invalidates the cached collection.
//!
//! Concurrent misses on the same key are not serialized: both requests read
//! the store and both write the entry, and the last write wins. Records are
//! immutable, so both writers store the same value.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::ExpiringCache;
use crate::error::{BridgeError, Result};
use crate::models::{NewRecord, Record, RecordId, Sourced};
use crate::service::StatsRecorder;
use crate::store::RecordStore;

/// Cache key of the whole-collection entry.
pub const ALL_RECORDS_KEY: &str = "records:all";

/// Lifetime of every entry the coordinator writes.
pub const RECORD_TTL_SECS: u64 = 60;

/// Cache key of a single record.
pub fn record_key(id: &RecordId) -> String {
    format!("record:{}", id)
}

/// Read/write/invalidate protocol over an injected store and cache.
pub struct CacheAside {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ExpiringCache>,
    stats: Arc<StatsRecorder>,
    ttl_secs: u64,
}

impl CacheAside {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn ExpiringCache>,
        stats: Arc<StatsRecorder>,
    ) -> Self {
        Self {
            store,
            cache,
            stats,
            ttl_secs: RECORD_TTL_SECS,
        }
    }

    pub fn stats(&self) -> &Arc<StatsRecorder> {
        &self.stats
    }

    // == Create ==
    /// Writes a new record and drops the cached collection.
    ///
    /// The invalidation runs on every successful write, whether or not a
    /// collection entry was cached.
    pub async fn create_record(&self, name: &str, email: &str) -> Result<Record> {
        self.stats.record_request();

        // Whitespace-only counts as empty; accepted values are stored as sent.
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(BridgeError::Validation("Name & email required".to_string()));
        }

        let record = self
            .store
            .insert(NewRecord {
                name: name.to_string(),
                email: email.to_string(),
            })
            .await?;

        let dropped = self.cache.delete(ALL_RECORDS_KEY).await?;
        info!(id = %record.id, dropped, "record created, collection cache invalidated");

        Ok(record)
    }

    // == Get ==
    /// Reads one record, cache first.
    ///
    /// Malformed identifiers are rejected before the cache or the store is
    /// touched. An unknown identifier is neither cached nor counted as a miss.
    pub async fn get_record(&self, raw_id: &str) -> Result<Sourced<Record>> {
        self.stats.record_request();

        let id = RecordId::parse(raw_id)?;
        let key = record_key(&id);

        if let Some(record) = self.cached::<Record>(&key).await? {
            self.stats.record_hit();
            debug!(key = %key, "cache hit");
            return Ok(Sourced::cache(record));
        }

        let record = self
            .store
            .find(&id)
            .await?
            .ok_or_else(|| BridgeError::NotFound("User not found".to_string()))?;

        self.populate(&key, &record).await?;
        self.stats.record_miss();
        debug!(key = %key, "cache miss");

        Ok(Sourced::store(record))
    }

    // == List ==
    /// Reads the whole collection, cache first.
    pub async fn list_records(&self) -> Result<Sourced<Vec<Record>>> {
        self.stats.record_request();

        if let Some(records) = self.cached::<Vec<Record>>(ALL_RECORDS_KEY).await? {
            self.stats.record_hit();
            debug!(key = ALL_RECORDS_KEY, "cache hit");
            return Ok(Sourced::cache(records));
        }

        let records = self.store.list().await?;

        self.populate(ALL_RECORDS_KEY, &records).await?;
        self.stats.record_miss();
        debug!(key = ALL_RECORDS_KEY, count = records.len(), "cache miss");

        Ok(Sourced::store(records))
    }

    // == Clear ==
    /// Purges every cache entry, including keys this service did not write.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.flush_all().await?;
        info!("cache cleared");
        Ok(())
    }

    /// Reads and decodes a cache entry. An undecodable payload counts as absent.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(payload) = self.cache.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key = %key, error = %err, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.cache.set_ex(key, payload, self.ttl_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyTtl, MemoryCache};
    use crate::models::Source;
    use crate::store::MemoryRecordStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Cache whose backend is never reachable.
    struct UnreachableCache;

    #[async_trait]
    impl ExpiringCache for UnreachableCache {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn set_ex(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<()> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn delete(&self, _key: &str) -> Result<bool> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn flush_all(&self) -> Result<()> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn key_count(&self) -> Result<u64> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn memory_usage(&self) -> Result<String> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn sample_keys(&self, _limit: usize) -> Result<Vec<String>> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
        async fn ttl(&self, _key: &str) -> Result<KeyTtl> {
            Err(BridgeError::CacheUnavailable("connection refused".into()))
        }
    }

    /// Store wrapper counting every call that reaches it.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryRecordStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn insert(&self, record: NewRecord) -> Result<Record> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(record).await
        }
        async fn find(&self, id: &RecordId) -> Result<Option<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find(id).await
        }
        async fn list(&self) -> Result<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list().await
        }
        async fn count(&self) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.count().await
        }
    }

    fn coordinator() -> (CacheAside, MemoryCache) {
        let cache = MemoryCache::new();
        let service = CacheAside::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(cache.clone()),
            Arc::new(StatsRecorder::new()),
        );
        (service, cache)
    }

    #[tokio::test]
    async fn test_create_then_get_twice() {
        let (service, _) = coordinator();

        let ann = service.create_record("Ann", "ann@x.com").await.unwrap();
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.email, "ann@x.com");

        let first = service.get_record(&ann.id.to_string()).await.unwrap();
        assert_eq!(first.source, Source::Store);
        assert_eq!(first.data, ann);

        let second = service.get_record(&ann.id.to_string()).await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.data, first.data);

        let stats = service.stats().snapshot();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.requests, 3);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let (service, _) = coordinator();

        for (name, email) in [("", "a@x.com"), ("Ann", ""), ("  ", "a@x.com"), ("", "")] {
            let result = service.create_record(name, email).await;
            assert!(matches!(result, Err(BridgeError::Validation(_))));
        }
        assert!(service.list_records().await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn test_create_stores_fields_as_sent() {
        let (service, _) = coordinator();
        let ann = service.create_record(" Ann ", "ann@x.com\n").await.unwrap();
        assert_eq!(ann.name, " Ann ");
        assert_eq!(ann.email, "ann@x.com\n");

        let read = service.get_record(&ann.id.to_string()).await.unwrap();
        assert_eq!(read.data.name, " Ann ");

        let blank = service.create_record("   ", "ann@x.com").await;
        assert!(matches!(blank, Err(BridgeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_invalidates_collection() {
        let (service, cache) = coordinator();
        service.create_record("Ann", "ann@x.com").await.unwrap();

        let listed = service.list_records().await.unwrap();
        assert_eq!(listed.source, Source::Store);
        assert!(cache.get(ALL_RECORDS_KEY).await.unwrap().is_some());

        let bob = service.create_record("Bob", "bob@x.com").await.unwrap();
        assert!(cache.get(ALL_RECORDS_KEY).await.unwrap().is_none());

        let listed = service.list_records().await.unwrap();
        assert_eq!(listed.source, Source::Store);
        assert!(listed.data.contains(&bob));
        assert_eq!(listed.data.len(), 2);
    }

    #[tokio::test]
    async fn test_list_second_read_is_cached() {
        let (service, cache) = coordinator();
        service.create_record("Ann", "ann@x.com").await.unwrap();

        let first = service.list_records().await.unwrap();
        let second = service.list_records().await.unwrap();
        assert_eq!(first.source, Source::Store);
        assert_eq!(second.source, Source::Cache);
        assert_eq!(first.data, second.data);

        match cache.ttl(ALL_RECORDS_KEY).await.unwrap() {
            KeyTtl::Expiring(secs) => assert!(secs <= RECORD_TTL_SECS && secs >= RECORD_TTL_SECS - 1),
            other => panic!("unexpected ttl {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (service, cache) = coordinator();
        let id = RecordId::generate();

        let result = service.get_record(&id.to_string()).await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
        assert!(cache.get(&record_key(&id)).await.unwrap().is_none());
        assert_eq!(service.stats().snapshot().misses, 0);
    }

    #[tokio::test]
    async fn test_malformed_id_touches_nothing() {
        let store = Arc::new(CountingStore::default());
        let service = CacheAside::new(
            store.clone(),
            Arc::new(UnreachableCache),
            Arc::new(StatsRecorder::new()),
        );

        let result = service.get_record("not-an-id").await;
        assert!(matches!(result, Err(BridgeError::Validation(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_then_get_is_miss() {
        let (service, cache) = coordinator();
        let ann = service.create_record("Ann", "ann@x.com").await.unwrap();
        let id = ann.id.to_string();

        service.get_record(&id).await.unwrap();
        assert_eq!(service.get_record(&id).await.unwrap().source, Source::Cache);

        cache.set_persistent("foreign:key", "x".to_string()).await;
        service.clear_cache().await.unwrap();
        service.clear_cache().await.unwrap();
        assert_eq!(cache.key_count().await.unwrap(), 0);

        assert_eq!(service.get_record(&id).await.unwrap().source, Source::Store);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_refetched() {
        let (service, cache) = coordinator();
        let ann = service.create_record("Ann", "ann@x.com").await.unwrap();

        cache
            .set_ex(&record_key(&ann.id), "{not json".to_string(), 60)
            .await
            .unwrap();

        let read = service.get_record(&ann.id.to_string()).await.unwrap();
        assert_eq!(read.source, Source::Store);
        assert_eq!(read.data, ann);
    }

    #[tokio::test]
    async fn test_unreachable_cache_fails_reads() {
        let service = CacheAside::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(UnreachableCache),
            Arc::new(StatsRecorder::new()),
        );

        assert!(matches!(
            service.list_records().await,
            Err(BridgeError::CacheUnavailable(_))
        ));
        assert!(matches!(
            service.get_record(&RecordId::generate().to_string()).await,
            Err(BridgeError::CacheUnavailable(_))
        ));
        assert!(matches!(
            service.clear_cache().await,
            Err(BridgeError::CacheUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_cache_fails_create_after_write() {
        let store = Arc::new(MemoryRecordStore::new());
        let service = CacheAside::new(
            store.clone(),
            Arc::new(UnreachableCache),
            Arc::new(StatsRecorder::new()),
        );

        let result = service.create_record("Ann", "ann@x.com").await;
        assert!(matches!(result, Err(BridgeError::CacheUnavailable(_))));
        // The store write is not rolled back.
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_count_every_lookup() {
        let (service, _) = coordinator();
        let service = Arc::new(service);
        let ann = service.create_record("Ann", "ann@x.com").await.unwrap();
        let id = ann.id.to_string();

        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let service = Arc::clone(&service);
                let id = id.clone();
                tokio::spawn(async move { service.get_record(&id).await })
            })
            .collect();

        for task in tasks {
            let read = task.await.unwrap().unwrap();
            assert_eq!(read.data, ann);
        }

        let stats = service.stats().snapshot();
        assert_eq!(stats.hits + stats.misses, 200);
        assert!(stats.misses >= 1);
        assert_eq!(stats.requests, 201);
    }
}
