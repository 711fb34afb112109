//! Cache Module
//!
//! The expiring key-value cache contract and its two backends: Redis, and an
//! in-memory TTL map used when no Redis URL is configured.

mod backend;
mod entry;
mod memory;
mod redis_cache;
mod store;

// Re-export public types
pub use backend::{ExpiringCache, KeyTtl};
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::CacheStore;
