//! In-process record store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{NewRecord, Record, RecordId};
use crate::store::RecordStore;

/// Record store kept in memory, in insertion order.
///
/// Cloning is cheap and every clone sees the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<Record>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: NewRecord) -> Result<Record> {
        let record = record.with_id(RecordId::generate());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: &RecordId) -> Result<Option<Record>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().await.clone())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
