//! API Handlers
//!
//! HTTP request handlers for each KV server endpoint. The handlers are a
//! thin presentation layer: absence becomes 404 for scalar reads, and the
//! `enabled` gate lives here, not in the engine, so in-process collaborators
//! can keep using the store while the public surface is turned off.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::models::{
    AckResponse, CounterRequest, CounterResponse, ExistsResponse, ExpireRequest, ExpireResponse,
    HashAllResponse, HashCounterRequest, HashDeleteRequest, HashSetRequest, HealthResponse,
    KeysParams, KeysResponse, LockRequest, LockResponse, MGetRequest, MGetResponse, MSetRequest,
    MSetResponse, SetRequest, StatsResponse, TtlResponse, ValueResponse,
};
use crate::store::{KvStore, MemoryL2};

// == App State ==
/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KvStore>,
}

impl AppState {
    pub fn new(store: KvStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Builds a state from configuration with the in-memory L2 stand-in.
    pub fn from_config(config: &Config) -> Self {
        Self::new(KvStore::new(config, Arc::new(MemoryL2::new())))
    }

    /// Rejects KV traffic while the public surface is disabled.
    fn ensure_enabled(&self) -> Result<()> {
        if self.store.is_enabled() {
            Ok(())
        } else {
            Err(KvError::Disabled)
        }
    }
}

// == Scalar Handlers ==

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<AckResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    state.store.set(&req.key, req.value, req.ttl).await?;
    Ok(Json(AckResponse::new("set", req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    state.ensure_enabled()?;
    match state.store.get(&key).await? {
        Some(value) => Ok(Json(ValueResponse::new(key, value))),
        None => Err(KvError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting a missing key still answers 200; the operation is idempotent.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    state.ensure_enabled()?;
    state.store.delete(&key).await?;
    Ok(Json(AckResponse::new("deleted", key)))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    state.ensure_enabled()?;
    let exists = state.store.exists(&key).await?;
    Ok(Json(ExistsResponse { key, exists }))
}

// == TTL Handlers ==

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    state.ensure_enabled()?;
    let ttl = state.store.ttl(&key).await?;
    Ok(Json(TtlResponse { key, ttl }))
}

/// Handler for POST /expire
pub async fn expire_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpireRequest>,
) -> Result<Json<ExpireResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    let applied = state.store.expire(&req.key, req.ttl).await?;
    Ok(Json(ExpireResponse {
        key: req.key,
        applied,
    }))
}

// == Counter Handlers ==

/// Handler for POST /incr
pub async fn incr_handler(
    State(state): State<AppState>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    let value = state.store.incr_by(&req.key, req.step()).await?;
    Ok(Json(CounterResponse {
        key: req.key,
        value,
    }))
}

/// Handler for POST /decr
pub async fn decr_handler(
    State(state): State<AppState>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    let value = state.store.incr_by(&req.key, -req.step()).await?;
    Ok(Json(CounterResponse {
        key: req.key,
        value,
    }))
}

// == Hash Handlers ==

/// Handler for POST /hset
pub async fn hset_handler(
    State(state): State<AppState>,
    Json(req): Json<HashSetRequest>,
) -> Result<Json<AckResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    state.store.hset(&req.key, &req.field, req.value).await?;
    Ok(Json(AckResponse::new("updated", req.key)))
}

/// Handler for GET /hget/:key/:field
pub async fn hget_handler(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
) -> Result<Json<ValueResponse>> {
    state.ensure_enabled()?;
    match state.store.hget(&key, &field).await? {
        Some(value) => Ok(Json(ValueResponse::new(key, value))),
        None => Err(KvError::NotFound(format!("{}:{}", key, field))),
    }
}

/// Handler for GET /hgetall/:key
///
/// An absent key answers 200 with an empty field map.
pub async fn hgetall_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HashAllResponse>> {
    state.ensure_enabled()?;
    let fields = state.store.hget_all(&key).await?;
    Ok(Json(HashAllResponse { key, fields }))
}

/// Handler for POST /hdel
pub async fn hdel_handler(
    State(state): State<AppState>,
    Json(req): Json<HashDeleteRequest>,
) -> Result<Json<AckResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    state.store.hdel(&req.key, &req.field).await?;
    Ok(Json(AckResponse::new("updated", req.key)))
}

/// Handler for POST /hincrby
pub async fn hincrby_handler(
    State(state): State<AppState>,
    Json(req): Json<HashCounterRequest>,
) -> Result<Json<CounterResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    let value = state.store.hincr_by(&req.key, &req.field, req.delta).await?;
    Ok(Json(CounterResponse {
        key: req.key,
        value,
    }))
}

// == Batch Handlers ==

/// Handler for POST /mset
pub async fn mset_handler(
    State(state): State<AppState>,
    Json(req): Json<MSetRequest>,
) -> Result<Json<MSetResponse>> {
    state.ensure_enabled()?;
    let count = req.entries.len();
    state.store.mset(req.entries).await?;
    Ok(Json(MSetResponse::new(count)))
}

/// Handler for POST /mget
pub async fn mget_handler(
    State(state): State<AppState>,
    Json(req): Json<MGetRequest>,
) -> Result<Json<MGetResponse>> {
    state.ensure_enabled()?;
    let values = state
        .store
        .mget(&req.keys)
        .await?
        .into_iter()
        .map(|value| value.unwrap_or(Value::Null))
        .collect();
    Ok(Json(MGetResponse { values }))
}

// == Lock Handlers ==

/// Handler for POST /lock
pub async fn lock_handler(
    State(state): State<AppState>,
    Json(req): Json<LockRequest>,
) -> Result<Json<LockResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    let acquired = state.store.lock(&req.key, req.ttl.unwrap_or(30)).await;
    Ok(Json(LockResponse {
        key: req.key,
        acquired,
    }))
}

/// Handler for POST /unlock
pub async fn unlock_handler(
    State(state): State<AppState>,
    Json(req): Json<LockRequest>,
) -> Result<Json<AckResponse>> {
    state.ensure_enabled()?;
    if let Some(message) = req.validate() {
        return Err(KvError::InvalidRequest(message));
    }
    state.store.unlock(&req.key).await;
    Ok(Json(AckResponse::new("unlocked", req.key)))
}

// == Query Handlers ==

/// Handler for GET /keys
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(params): Query<KeysParams>,
) -> Result<Json<KeysResponse>> {
    state.ensure_enabled()?;
    let pattern = params.pattern.unwrap_or_else(|| "*".to_string());
    let keys = state.store.keys(&pattern).await?;
    Ok(Json(KeysResponse { keys }))
}

/// Handler for GET /stats
///
/// Observability stays reachable regardless of the enabled gate.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store.stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
