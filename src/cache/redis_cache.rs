//! Redis cache backend over a deadpool connection pool.

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, PoolError, Runtime};
use redis::{AsyncCommands, RedisError};
use tracing::{debug, info};

use crate::cache::{ExpiringCache, KeyTtl};
use crate::error::{BridgeError, Result};

impl From<RedisError> for BridgeError {
    fn from(err: RedisError) -> Self {
        BridgeError::CacheUnavailable(err.to_string())
    }
}

impl From<PoolError> for BridgeError {
    fn from(err: PoolError) -> Self {
        BridgeError::CacheUnavailable(err.to_string())
    }
}

/// Cache backed by a Redis server.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Builds a pool for `url` and verifies the server answers PING.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PoolConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| BridgeError::CacheUnavailable(e.to_string()))?;

        let cache = Self { pool };
        let mut conn = cache.conn().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(reply = %pong, "Connected to Redis");

        Ok(cache)
    }

    async fn conn(&self) -> Result<Connection> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl ExpiringCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }

    async fn key_count(&self) -> Result<u64> {
        let mut conn = self.conn().await?;
        let count: u64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        Ok(count)
    }

    async fn memory_usage(&self) -> Result<String> {
        let mut conn = self.conn().await?;
        let info: String = redis::cmd("INFO").arg("memory").query_async(&mut conn).await?;
        Ok(parse_used_memory(&info).unwrap_or_else(|| "unknown".to_string()))
    }

    async fn sample_keys(&self, limit: usize) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        let mut keys = Vec::with_capacity(limit);
        let mut cursor: u64 = 0;

        // SCAN may return fewer or more keys than COUNT per round.
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("COUNT")
                .arg(limit)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);

            if next == 0 || keys.len() >= limit {
                break;
            }
            cursor = next;
        }

        keys.truncate(limit);
        debug!(sampled = keys.len(), "sampled cache keys");
        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        let mut conn = self.conn().await?;
        let ttl: i64 = conn.ttl(key).await?;
        Ok(ttl_from_reply(ttl))
    }

    async fn close(&self) {
        self.pool.close();
    }
}

/// Maps a Redis TTL reply: -2 missing key, -1 no expiry.
fn ttl_from_reply(reply: i64) -> KeyTtl {
    match reply {
        -1 => KeyTtl::Persistent,
        secs if secs >= 0 => KeyTtl::Expiring(secs as u64),
        _ => KeyTtl::Missing,
    }
}

/// Extracts `used_memory_human` from an `INFO memory` reply.
fn parse_used_memory(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("used_memory_human:"))
        .map(|value| value.trim().to_string())
}
