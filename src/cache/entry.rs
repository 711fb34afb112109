//! Cache Entry Module
//!
//! A stored payload plus the deadline after which the in-memory backend
//! treats it as gone.

use std::time::{Duration, Instant};

use crate::cache::KeyTtl;

// == Cache Entry ==
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload
    pub value: String,
    /// None for keys written without an expiry
    pub deadline: Option<Instant>,
}

impl CacheEntry {
    /// Entry that lives for `ttl_secs` from now, as `SETEX` would store it.
    pub fn expiring(value: String, ttl_secs: u64) -> Self {
        Self {
            value,
            deadline: Some(Instant::now() + Duration::from_secs(ttl_secs)),
        }
    }

    /// Entry with no deadline.
    pub fn persistent(value: String) -> Self {
        Self {
            value,
            deadline: None,
        }
    }

    /// Whether the entry is still readable at `now`.
    ///
    /// The deadline itself counts as expired, so a zero TTL never reads back.
    pub fn is_live_at(&self, now: Instant) -> bool {
        self.deadline.map_or(true, |deadline| now < deadline)
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(Instant::now())
    }

    /// Remaining lifetime at `now`, reported the way the `TTL` command does:
    /// milliseconds rounded to the nearest second.
    pub fn ttl_at(&self, now: Instant) -> KeyTtl {
        match self.deadline {
            None => KeyTtl::Persistent,
            Some(deadline) if now < deadline => {
                let millis = deadline.duration_since(now).as_millis() as u64;
                KeyTtl::Expiring((millis + 500) / 1000)
            }
            Some(_) => KeyTtl::Missing,
        }
    }

    /// Approximate heap footprint of the entry in bytes.
    pub fn size_hint(&self) -> usize {
        self.value.len() + std::mem::size_of::<Self>()
    }
}
