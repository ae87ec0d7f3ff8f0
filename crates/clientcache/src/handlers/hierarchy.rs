use std::time::Instant;

use axum::extract::State;

use clientcache_core::filter::FilterCriteria;
use clientcache_core::hierarchy::{build_hierarchy, ParentNode};

use super::{ApiJson, ApiResponse, AppError};
use crate::state::AppState;

/// Fetch records matching a filter as a parent/client/customer tree
/// (POST /api/hierarchy).
///
/// Parent groups whose id is not numeric are left out and logged; the rest
/// of the tree is still returned.
pub async fn fetch_hierarchy(
    State(state): State<AppState>,
    ApiJson(criteria): ApiJson<FilterCriteria>,
) -> Result<ApiResponse<Vec<ParentNode>>, AppError> {
    let records = state.records.fetch_records(&criteria).await?;

    let started = Instant::now();
    let outcome = build_hierarchy(&records);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    for skipped in &outcome.skipped {
        tracing::warn!(
            parent_id = %skipped.parent_id,
            records = skipped.records,
            reason = %skipped.reason,
            "Skipped parent group while building hierarchy"
        );
    }

    tracing::info!(
        elapsed_ms,
        records = records.len(),
        parents = outcome.parents.len(),
        partial = outcome.is_partial(),
        "Built hierarchy"
    );

    Ok(ApiResponse::ok(
        outcome.parents,
        "Hierarchy retrieved successfully",
    ))
}
