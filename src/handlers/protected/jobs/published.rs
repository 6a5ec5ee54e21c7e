// handlers/protected/jobs/published.rs - GET /api/v1/jobs/published handler

use axum::{extract::State, Extension};

use crate::database::models::Job;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn jobs_published_get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.published_by(user.id).await?;
    Ok(ApiResponse::results(jobs))
}
