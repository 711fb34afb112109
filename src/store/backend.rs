//! Durable record store abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewRecord, Record, RecordId};

/// Source of truth for records.
///
/// Implementations assign identifiers on insert and report any backend
/// failure as `BridgeError::StoreUnavailable`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Writes a new record and returns it with its assigned identifier.
    async fn insert(&self, record: NewRecord) -> Result<Record>;

    /// Looks up a record by identifier.
    async fn find(&self, id: &RecordId) -> Result<Option<Record>>;

    /// Reads the whole collection.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Releases connections. Called once by the composition root at shutdown.
    async fn close(&self) {}
}
