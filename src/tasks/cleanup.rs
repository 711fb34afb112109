//! Expired-entry sweeper
//!
//! Reads already hide expired entries in the in-memory cache. The sweeper
//! reclaims the memory they still hold so `key_count` and memory usage stay
//! close to what a Redis server would report.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns the sweeper for `cache`, ticking every `every_secs` seconds.
///
/// The write lock is held only while a sweep runs. The returned handle is
/// aborted by [`crate::Backends::shutdown`].
pub fn spawn_cleanup_task(cache: MemoryCache, every_secs: u64) -> JoinHandle<()> {
    let store = cache.store();
    let period = Duration::from_secs(every_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; nothing can have expired yet.
        ticker.tick().await;

        info!(every_secs = period.as_secs(), "Cache sweeper started");

        loop {
            ticker.tick().await;

            let swept = store.write().await.cleanup_expired();
            if swept > 0 {
                info!(swept, "Swept expired cache entries");
            } else {
                debug!("Cache sweep found nothing to remove");
            }
        }
    })
}
