// handlers/protected/jobs/applied.rs - GET /api/v1/jobs/applied handler

use axum::{extract::State, Extension};

use crate::database::models::Job;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn jobs_applied_get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.applied_by(user.id).await?;
    Ok(ApiResponse::results(jobs))
}
