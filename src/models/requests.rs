//! Request DTOs for the cache-aside API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /users
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation error (400) rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
}
