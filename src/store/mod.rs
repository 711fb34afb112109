//! Backing Store Module
//!
//! The durable record store contract and its backends: MongoDB, and an
//! in-process store used when no connection string is configured.

mod backend;
mod memory;
mod mongo;

pub use backend::RecordStore;
pub use memory::MemoryRecordStore;
pub use mongo::MongoRecordStore;
