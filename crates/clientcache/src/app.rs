use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        cache::{cache_stats, evict_value, get_value, set_value},
        health::{healthz, livez, preload_status},
        hierarchy::fetch_hierarchy,
        records::fetch_records,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/records", post(fetch_records))
        .route("/hierarchy", post(fetch_hierarchy))
        .route("/cache/get", post(get_value))
        .route("/cache/set", post(set_value))
        .route("/cache/evict", post(evict_value))
        .route("/cache/stats", get(cache_stats))
        .route("/preload/status", get(preload_status))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
