// handlers/public/jobs/stats.rs - GET /api/v1/stats/:topic handler

use axum::extract::{Path, State};

use crate::database::models::JobStats;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Salary and position aggregates per experience level for jobs whose title
/// contains `topic` (case-insensitive).
pub async fn job_stats_get(State(state): State<AppState>, Path(topic): Path<String>) -> ApiResult<Vec<JobStats>> {
    let stats = state.jobs.stats(&topic).await?;
    if stats.is_empty() {
        return Err(ApiError::not_found(format!("No stats found for {}", topic)));
    }
    Ok(ApiResponse::success(stats))
}
