//! Service Module
//!
//! The cache-aside coordinator and the statistics, metrics, and health
//! components built around it.

mod coordinator;
mod health;
mod metrics;
mod stats;


// Re-export public types
pub use coordinator::{record_key, CacheAside, ALL_RECORDS_KEY, RECORD_TTL_SECS};
pub use health::{HealthCheck, HealthReport, ProbeOutcome};
pub use metrics::{MetricsAggregator, MetricsSnapshot, TTL_SAMPLE_SIZE};
pub use stats::{StatsRecorder, StatsSnapshot};
