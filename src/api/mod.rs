//! API Module
//!
//! HTTP handlers and routing for the cache-aside REST API.
//!
//! # Endpoints
//! - `POST /users` - Create a user
//! - `GET /users` - List users
//! - `GET /users/:id` - Fetch a user by id
//! - `DELETE /cache/clear` - Purge the cache
//! - `GET /health` - Health check endpoint
//! - `GET /metrics` - Cache metrics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, create_router_for_origin};
