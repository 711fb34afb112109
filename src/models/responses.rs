//! Response DTOs for the cache-aside API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::models::record::{Record, Source, Sourced};
use crate::service::{HealthReport, MetricsSnapshot, ProbeOutcome};

/// Response body for GET /users/:id
///
/// The record fields are flattened next to the provenance tag.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: Record,
    pub source: Source,
}

impl From<Sourced<Record>> for UserResponse {
    fn from(read: Sourced<Record>) -> Self {
        Self {
            user: read.data,
            source: read.source,
        }
    }
}

/// Response body for GET /users
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<Record>,
    pub source: Source,
}

impl From<Sourced<Vec<Record>>> for UsersResponse {
    fn from(read: Sourced<Vec<Record>>) -> Self {
        Self {
            users: read.data,
            source: read.source,
        }
    }
}

/// Response body for DELETE /cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for GET /metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub hits: u64,
    pub misses: u64,
    pub requests: u64,
    #[serde(rename = "cacheMemoryUsage")]
    pub cache_memory_usage: String,
    #[serde(rename = "averageRemainingTTL")]
    pub average_remaining_ttl: f64,
    #[serde(rename = "hitRatio")]
    pub hit_ratio: f64,
}

impl From<MetricsSnapshot> for MetricsResponse {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            hits: snapshot.stats.hits,
            misses: snapshot.stats.misses,
            requests: snapshot.stats.requests,
            hit_ratio: snapshot.stats.hit_ratio(),
            cache_memory_usage: snapshot.cache_memory_usage,
            average_remaining_ttl: snapshot.average_remaining_ttl,
        }
    }
}

// == Health ==
/// API section of the health body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
}

/// Store section of the health body.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<u64>,
}

/// Cache section of the health body.
#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<u64>,
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub api: ApiHealth,
    pub mongo: StoreHealth,
    pub redis: CacheHealth,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn component_status(outcome: &ProbeOutcome) -> (&'static str, Option<u64>) {
    match outcome {
        ProbeOutcome::Online(count) => ("online", Some(*count)),
        ProbeOutcome::Offline(_) => ("offline", None),
    }
}

impl From<&HealthReport> for HealthResponse {
    fn from(report: &HealthReport) -> Self {
        let healthy = report.is_healthy();
        let (store_status, docs) = component_status(&report.store);
        let (cache_status, keys) = component_status(&report.cache);

        Self {
            api: ApiHealth {
                status: if healthy { "online" } else { "error" },
                latency: healthy.then_some(report.latency_ms),
            },
            mongo: StoreHealth {
                status: store_status,
                docs,
            },
            redis: CacheHealth {
                status: cache_status,
                keys,
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            error: (!healthy).then(|| "Health check failed".to_string()),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{NewRecord, RecordId};
    use crate::service::StatsSnapshot;

    fn ann() -> Record {
        NewRecord {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
        }
        .with_id(RecordId::parse("507f1f77bcf86cd799439011").unwrap())
    }

    #[test]
    fn test_user_response_flattens_record() {
        let resp = UserResponse::from(Sourced::cache(ann()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "507f1f77bcf86cd799439011");
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["email"], "ann@x.com");
        assert_eq!(json["source"], "cache");
    }

    #[test]
    fn test_users_response_serialize() {
        let resp = UsersResponse::from(Sourced::store(vec![ann()]));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["users"].as_array().unwrap().len(), 1);
        assert_eq!(json["source"], "mongo");
    }

    #[test]
    fn test_metrics_response_field_names() {
        let resp = MetricsResponse::from(MetricsSnapshot {
            stats: StatsSnapshot {
                hits: 3,
                misses: 1,
                requests: 5,
            },
            cache_memory_usage: "1.00K".to_string(),
            average_remaining_ttl: 42.5,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hits"], 3);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["requests"], 5);
        assert_eq!(json["cacheMemoryUsage"], "1.00K");
        assert_eq!(json["averageRemainingTTL"], 42.5);
        assert_eq!(json["hitRatio"], 0.75);
    }

    #[test]
    fn test_health_response_online() {
        let report = HealthReport {
            latency_ms: 4,
            store: ProbeOutcome::Online(12),
            cache: ProbeOutcome::Online(3),
        };
        let json = serde_json::to_value(HealthResponse::from(&report)).unwrap();
        assert_eq!(json["api"]["status"], "online");
        assert_eq!(json["api"]["latency"], 4);
        assert_eq!(json["mongo"]["docs"], 12);
        assert_eq!(json["redis"]["keys"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_health_response_partial() {
        let report = HealthReport {
            latency_ms: 9,
            store: ProbeOutcome::Online(12),
            cache: ProbeOutcome::Offline("connection refused".to_string()),
        };
        let json = serde_json::to_value(HealthResponse::from(&report)).unwrap();
        assert_eq!(json["api"]["status"], "error");
        assert!(json["api"].get("latency").is_none());
        assert_eq!(json["mongo"]["status"], "online");
        assert_eq!(json["redis"]["status"], "offline");
        assert!(json["redis"].get("keys").is_none());
        assert_eq!(json["error"], "Health check failed");
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("User not found");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("User not found"));
    }
}
