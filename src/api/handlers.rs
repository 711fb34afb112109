//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers only translate between
//! HTTP and the service layer.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::backends::Backends;
use crate::cache::ExpiringCache;
use crate::error::Result;
use crate::models::{
    ClearResponse, CreateUserRequest, HealthResponse, MetricsResponse, Record, UserResponse,
    UsersResponse,
};
use crate::service::{CacheAside, HealthCheck, MetricsAggregator, StatsRecorder};
use crate::store::RecordStore;

/// Application state shared across all handlers.
///
/// Every component shares one [`StatsRecorder`], so the metrics endpoint sees
/// the counters the coordinator writes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CacheAside>,
    pub metrics: Arc<MetricsAggregator>,
    pub health: Arc<HealthCheck>,
}

impl AppState {
    /// Wires the service components around the given backends.
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn ExpiringCache>) -> Self {
        let stats = Arc::new(StatsRecorder::new());

        Self {
            service: Arc::new(CacheAside::new(
                Arc::clone(&store),
                Arc::clone(&cache),
                Arc::clone(&stats),
            )),
            metrics: Arc::new(MetricsAggregator::new(stats, Arc::clone(&cache))),
            health: Arc::new(HealthCheck::new(store, cache)),
        }
    }

    /// Creates a new AppState from connected backends.
    pub fn from_backends(backends: &Backends) -> Self {
        Self::new(Arc::clone(&backends.store), Arc::clone(&backends.cache))
    }
}

/// Handler for POST /users
///
/// Any body axum cannot decode answers 400 with a JSON `error`, like a
/// body with missing fields.
pub async fn create_user_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>)> {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            // Counted like any other create attempt.
            state.service.stats().record_request();
            return Err(rejection.into());
        }
    };
    let name = req.name.unwrap_or_default();
    let email = req.email.unwrap_or_default();

    let record = state.service.create_record(&name, &email).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let read = state.service.get_record(&id).await?;
    Ok(Json(read.into()))
}

/// Handler for GET /users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let read = state.service.list_records().await?;
    Ok(Json(read.into()))
}

/// Handler for DELETE /cache/clear
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.service.clear_cache().await?;
    Ok(Json(ClearResponse::cleared()))
}

/// Handler for GET /health
///
/// Answers 500 with per-component statuses when any backend is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.health.probe().await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(HealthResponse::from(&report)))
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Json<MetricsResponse>> {
    let snapshot = state.metrics.collect().await?;
    Ok(Json(snapshot.into()))
}
