use axum::extract::State;

use clientcache_core::filter::FilterCriteria;
use clientcache_core::record::FlatRecord;

use super::{ApiJson, ApiResponse, AppError};
use crate::state::AppState;

/// Fetch records matching a filter (POST /api/records).
pub async fn fetch_records(
    State(state): State<AppState>,
    ApiJson(criteria): ApiJson<FilterCriteria>,
) -> Result<ApiResponse<Vec<FlatRecord>>, AppError> {
    let records = state.records.fetch_records(&criteria).await?;

    tracing::debug!(records = records.len(), "Fetched product services records");

    Ok(ApiResponse::ok(records, "Records retrieved successfully"))
}
