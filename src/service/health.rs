//! Backend health probe.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use crate::cache::ExpiringCache;
use crate::store::RecordStore;

/// Result of probing one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Reachable; carries the backend's element count
    Online(u64),
    /// Unreachable; carries the error detail for logging
    Offline(String),
}

/// Outcome of one health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// Wall time of the probe in milliseconds
    pub latency_ms: u64,
    /// Document count of the backing store
    pub store: ProbeOutcome,
    /// Key count of the cache
    pub cache: ProbeOutcome,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.store, ProbeOutcome::Online(_)) && matches!(self.cache, ProbeOutcome::Online(_))
    }
}

pub struct HealthCheck {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ExpiringCache>,
}

impl HealthCheck {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn ExpiringCache>) -> Self {
        Self { store, cache }
    }

    /// Probes both backends concurrently.
    pub async fn probe(&self) -> HealthReport {
        let start = Instant::now();
        let (docs, keys) = tokio::join!(self.store.count(), self.cache.key_count());
        let latency_ms = start.elapsed().as_millis() as u64;

        let store = match docs {
            Ok(count) => ProbeOutcome::Online(count),
            Err(err) => {
                warn!(error = %err, "store health probe failed");
                ProbeOutcome::Offline(err.to_string())
            }
        };
        let cache = match keys {
            Ok(count) => ProbeOutcome::Online(count),
            Err(err) => {
                warn!(error = %err, "cache health probe failed");
                ProbeOutcome::Offline(err.to_string())
            }
        };

        HealthReport {
            latency_ms,
            store,
            cache,
        }
    }
}
