//! CacheBridge - A cache-aside read-through API
//!
//! Serves user records from a document store through an expiring key-value
//! cache, tracking hit/miss statistics for a companion dashboard.

pub mod api;
pub mod backends;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use backends::Backends;
pub use config::Config;
pub use error::{BridgeError, Result};
