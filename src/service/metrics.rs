//! Metrics aggregation
//!
//! Combines recorder counters with cache introspection. The result is an
//! approximate, point-in-time observability aid: the TTL average covers a
//! bounded sample of keys in whatever order the backend enumerates them.

use std::sync::Arc;

use crate::cache::ExpiringCache;
use crate::error::Result;
use crate::service::{StatsRecorder, StatsSnapshot};

/// Maximum number of keys whose TTL feeds the average.
pub const TTL_SAMPLE_SIZE: usize = 50;

/// Operational snapshot served by GET /metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub stats: StatsSnapshot,
    pub cache_memory_usage: String,
    /// Mean remaining TTL in seconds over sampled keys that are still counting down
    pub average_remaining_ttl: f64,
}

pub struct MetricsAggregator {
    stats: Arc<StatsRecorder>,
    cache: Arc<dyn ExpiringCache>,
}

impl MetricsAggregator {
    pub fn new(stats: Arc<StatsRecorder>, cache: Arc<dyn ExpiringCache>) -> Self {
        Self { stats, cache }
    }

    pub async fn collect(&self) -> Result<MetricsSnapshot> {
        let stats = self.stats.snapshot();
        let cache_memory_usage = self.cache.memory_usage().await?;

        // Keys without expiry, or gone by the time we ask, are left out.
        let mut total: u64 = 0;
        let mut counted: u64 = 0;
        for key in self.cache.sample_keys(TTL_SAMPLE_SIZE).await? {
            if let Some(secs) = self.cache.ttl(&key).await?.positive_secs() {
                total += secs;
                counted += 1;
            }
        }

        let average_remaining_ttl = if counted == 0 {
            0.0
        } else {
            total as f64 / counted as f64
        };

        Ok(MetricsSnapshot {
            stats,
            cache_memory_usage,
            average_remaining_ttl,
        })
    }
}
