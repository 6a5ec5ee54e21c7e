// handlers/protected/jobs/create.rs - POST /api/v1/job/new handler

use axum::{extract::State, Extension};

use crate::database::models::{Job, JobRequest};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, SanitizedJson};
use crate::state::AppState;

/// Validates the posting, geocodes its address and stores it owned by the caller.
pub async fn job_new_post(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    SanitizedJson(body): SanitizedJson<JobRequest>,
) -> ApiResult<Job> {
    let new_job = body.validate_new()?;
    let location = state.geocoder.geocode(&new_job.address).await?;
    let job = state.jobs.create(&new_job, &location, user.id).await?;

    tracing::info!("User {} posted job {}", user.id, job.id);
    Ok(ApiResponse::created(job))
}
