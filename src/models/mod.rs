//! Domain types and request/response models for the cache-aside API
//!
//! `record` holds the stored record and its provenance tag; `requests` and
//! `responses` define the HTTP bodies.

pub mod record;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use record::{NewRecord, Record, RecordId, Source, Sourced};
pub use requests::CreateUserRequest;
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, MetricsResponse, UserResponse, UsersResponse,
};
