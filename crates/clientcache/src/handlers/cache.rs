//! Raw key/value access to the cache backend.
//!
//! Keys are stored under the `kv:` namespace so they never collide with
//! record entries.

use std::time::Duration;

use axum::extract::State;
use serde::Deserialize;

use clientcache_core::cache::{deserialize_json, raw_key, serialize_json};

use super::{ApiJson, ApiResponse, AppError, RequestError};
use crate::state::AppState;
use crate::storage::cached::CacheStatsSnapshot;

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    pub key: String,
    pub value: serde_json::Value,
    pub ttl_seconds: Option<u64>,
}

fn validate_key(key: &str) -> Result<String, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(RequestError::BadRequest("key must not be empty".to_string()).into());
    }
    Ok(raw_key(key))
}

/// Read a value (POST /api/cache/get). A missing key returns `data: null`.
pub async fn get_value(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<KeyRequest>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let key = validate_key(&request.key)?;

    let value = match state.cache.get(&key).await? {
        Some(bytes) => match deserialize_json::<serde_json::Value>(&bytes) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Stored value is not valid JSON");
                serde_json::Value::Null
            }
        },
        None => serde_json::Value::Null,
    };

    let message = if value.is_null() {
        "Key not found"
    } else {
        "Value retrieved successfully"
    };
    Ok(ApiResponse::ok(value, message))
}

/// Store a value (POST /api/cache/set).
pub async fn set_value(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SetRequest>,
) -> Result<ApiResponse<()>, AppError> {
    let key = validate_key(&request.key)?;
    let ttl = match request.ttl_seconds {
        Some(0) => {
            return Err(
                RequestError::BadRequest("ttlSeconds must be positive".to_string()).into(),
            )
        }
        Some(secs) => Duration::from_secs(secs),
        None => state.default_ttl,
    };

    let bytes = serialize_json(&request.value)?;
    state.cache.set(&key, &bytes, Some(ttl)).await?;

    tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Stored cache value");
    Ok(ApiResponse::empty("Value stored successfully"))
}

/// Remove a value (POST /api/cache/evict). Evicting a missing key succeeds.
pub async fn evict_value(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<KeyRequest>,
) -> Result<ApiResponse<()>, AppError> {
    let key = validate_key(&request.key)?;
    state.cache.delete(&key).await?;

    tracing::debug!(key = %key, "Evicted cache value");
    Ok(ApiResponse::empty("Value evicted successfully"))
}

/// Cache read counters since startup (GET /api/cache/stats).
pub async fn cache_stats(State(state): State<AppState>) -> ApiResponse<CacheStatsSnapshot> {
    ApiResponse::ok(state.stats.snapshot(), "Cache statistics retrieved successfully")
}
