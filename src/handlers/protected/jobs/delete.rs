// handlers/protected/jobs/delete.rs - DELETE /api/v1/job/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::owned_job;

/// Deletes the job and its applications; resume files go in the background.
pub async fn job_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    owned_job(&state, id, &user).await?;

    let resumes = state.jobs.resumes_for_job(id).await?;
    state.jobs.delete(id).await?;
    state.resumes.remove_detached(resumes);

    tracing::info!("User {} removed job {}", user.id, id);
    Ok(ApiResponse::message("Job removed"))
}
