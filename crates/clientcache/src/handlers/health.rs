//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Cache reachability, read counters and preload state

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use clientcache_core::preload::{PreloadState, PreloadStatus};

use super::ApiResponse;
use crate::state::AppState;
use crate::storage::cached::CacheStatsSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub cache: &'static str,
    pub stats: CacheStatsSnapshot,
    pub preload: PreloadState,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Cache and preload health.
///
/// A down cache is reported but still returns 200: reads fall back to the
/// data source.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> ApiResponse<HealthReport> {
    let cache = match state.cache.ping().await {
        Ok(()) => "up",
        Err(err) => {
            tracing::warn!(error = %err, "Cache health check failed");
            "down"
        }
    };
    let preload = state.preload_status.read().await.state;

    ApiResponse::ok(
        HealthReport {
            cache,
            stats: state.stats.snapshot(),
            preload,
        },
        "Service is running",
    )
}

/// GET /api/preload/status - Preload state and last summary.
#[axum::debug_handler]
pub async fn preload_status(State(state): State<AppState>) -> ApiResponse<PreloadStatus> {
    let status = state.preload_status.read().await.clone();
    ApiResponse::ok(status, "Preload status retrieved successfully")
}
