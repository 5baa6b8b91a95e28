//! Response DTOs for the KV server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::StoreStats;

/// Response for value-reading endpoints (GET /get/:key, GET /hget/...)
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: Value,
}

impl ValueResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Acknowledgement for write endpoints (PUT /set, DELETE /del/:key, ...)
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub message: String,
    pub key: String,
}

impl AckResponse {
    pub fn new(action: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' {} successfully", key, action),
            key,
        }
    }
}

/// Response for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response for GET /ttl/:key
///
/// `ttl` carries the engine sentinels: -2 absent/expired, -1 no expiry,
/// otherwise remaining whole seconds.
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub ttl: i64,
}

/// Response for POST /expire
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub key: String,
    /// False when the key was absent and nothing changed
    pub applied: bool,
}

/// Response for counter endpoints (POST /incr, /decr, /hincrby)
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub key: String,
    pub value: i64,
}

/// Response for GET /hgetall/:key
#[derive(Debug, Clone, Serialize)]
pub struct HashAllResponse {
    pub key: String,
    pub fields: Map<String, Value>,
}

/// Response for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Response for POST /mset
#[derive(Debug, Clone, Serialize)]
pub struct MSetResponse {
    pub message: String,
    pub count: usize,
}

impl MSetResponse {
    pub fn new(count: usize) -> Self {
        Self {
            message: format!("{} keys set successfully", count),
            count,
        }
    }
}

/// Response for POST /mget; `values` preserves request order with null for
/// absent keys
#[derive(Debug, Clone, Serialize)]
pub struct MGetResponse {
    pub values: Vec<Value>,
}

/// Response for POST /lock
#[derive(Debug, Clone, Serialize)]
pub struct LockResponse {
    pub key: String,
    pub acquired: bool,
}

/// Response for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub durability_failures: u64,
    pub total_entries: usize,
    pub total_bytes: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            durability_failures: stats.durability_failures,
            total_entries: stats.total_entries,
            total_bytes: stats.total_bytes,
            hit_rate,
        }
    }
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
