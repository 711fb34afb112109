//! Backend composition root
//!
//! Picks the store and cache implementations from configuration, connects
//! them, and owns their lifecycle until shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{ExpiringCache, MemoryCache, RedisCache};
use crate::config::Config;
use crate::store::{MemoryRecordStore, MongoRecordStore, RecordStore};
use crate::tasks::spawn_cleanup_task;

/// Connected store and cache, plus the tasks that serve them.
pub struct Backends {
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn ExpiringCache>,
    cleanup: Option<JoinHandle<()>>,
}

impl Backends {
    /// Connects the configured backends.
    ///
    /// A missing connection string selects the in-process backend; a
    /// configured backend that cannot be reached is a startup error.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.mongo_uri {
            Some(uri) => Arc::new(
                MongoRecordStore::connect(uri, &config.mongo_db)
                    .await
                    .context("failed to connect to MongoDB")?,
            ),
            None => {
                warn!("MONGO_URI not set, using in-memory record store");
                Arc::new(MemoryRecordStore::new())
            }
        };

        let mut cleanup = None;
        let cache: Arc<dyn ExpiringCache> = match &config.redis_url {
            Some(url) => Arc::new(
                RedisCache::connect(url)
                    .await
                    .context("failed to connect to Redis")?,
            ),
            None => {
                warn!("REDIS_URL not set, using in-memory cache");
                let cache = MemoryCache::new();
                cleanup = Some(spawn_cleanup_task(cache.clone(), config.cleanup_interval));
                Arc::new(cache)
            }
        };

        Ok(Self {
            store,
            cache,
            cleanup,
        })
    }

    /// In-process backends with no background sweeper.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryRecordStore::new()),
            cache: Arc::new(MemoryCache::new()),
            cleanup: None,
        }
    }

    /// Stops background tasks and releases backend connections.
    pub async fn shutdown(self) {
        if let Some(handle) = self.cleanup {
            handle.abort();
            info!("Cleanup task aborted");
        }
        self.cache.close().await;
        self.store.close().await;
        info!("Backends closed");
    }
}
