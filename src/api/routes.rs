//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    http::HeaderValue,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    clear_cache_handler, create_user_handler, get_user_handler, health_handler,
    list_users_handler, metrics_handler, AppState,
};

/// Creates the main router, allowing requests from any origin.
///
/// # Endpoints
/// - `POST /users` - Create a user
/// - `GET /users` - List users, cache first
/// - `GET /users/:id` - Fetch one user, cache first
/// - `DELETE /cache/clear` - Purge the cache
/// - `GET /health` - Backend reachability
/// - `GET /metrics` - Hit/miss counters and cache introspection
pub fn create_router(state: AppState) -> Router {
    build_router(state, AllowOrigin::any())
}

/// Creates the main router, allowing requests from the dashboard origin only.
///
/// Falls back to any origin when `origin` is not a valid header value.
pub fn create_router_for_origin(state: AppState, origin: &str) -> Router {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!(origin = %origin, "invalid CORS origin, allowing any origin");
            AllowOrigin::any()
        }
    };
    build_router(state, allow_origin)
}

fn build_router(state: AppState, allow_origin: AllowOrigin) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/:id", get(get_user_handler))
        .route("/cache/clear", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
