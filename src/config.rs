//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

const DEFAULT_PORT: u16 = 4001;
const DEFAULT_MONGO_DB: &str = "cachebridge";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4000";
const DEFAULT_CLEANUP_INTERVAL: u64 = 1;

/// Server configuration parameters.
///
/// Backend connection strings are optional: when one is absent the server
/// runs against the matching in-process backend instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// MongoDB connection string
    pub mongo_uri: Option<String>,
    /// MongoDB database holding the `users` collection
    pub mongo_db: String,
    /// Redis connection string
    pub redis_url: Option<String>,
    /// Origin allowed by the CORS layer (the dashboard)
    pub cors_origin: Option<String>,
    /// In-memory cache sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 4001)
    /// - `MONGO_URI` - MongoDB connection string (default: in-memory store)
    /// - `MONGO_DB` - Database name (default: cachebridge)
    /// - `REDIS_URL` - Redis connection string (default: in-memory cache)
    /// - `CORS_ORIGIN` - Allowed dashboard origin (default: http://localhost:4000)
    /// - `CLEANUP_INTERVAL` - In-memory cache sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            mongo_uri: non_empty_var("MONGO_URI"),
            mongo_db: non_empty_var("MONGO_DB").unwrap_or_else(|| DEFAULT_MONGO_DB.to_string()),
            redis_url: non_empty_var("REDIS_URL"),
            cors_origin: Some(
                non_empty_var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            ),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            mongo_uri: None,
            mongo_db: DEFAULT_MONGO_DB.to_string(),
            redis_url: None,
            cors_origin: Some(DEFAULT_CORS_ORIGIN.to_string()),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 4001);
        assert!(config.mongo_uri.is_none());
        assert_eq!(config.mongo_db, "cachebridge");
        assert!(config.redis_url.is_none());
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:4000"));
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("PORT");
        env::remove_var("MONGO_URI");
        env::remove_var("MONGO_DB");
        env::remove_var("REDIS_URL");
        env::remove_var("CORS_ORIGIN");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.server_port, 4001);
        assert!(config.mongo_uri.is_none());
        assert_eq!(config.mongo_db, "cachebridge");
        assert!(config.redis_url.is_none());
        assert_eq!(config.cleanup_interval, 1);
    }
}
