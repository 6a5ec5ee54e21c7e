// handlers/protected/jobs/update.rs - PUT /api/v1/job/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::{Job, JobRequest};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, SanitizedJson};
use crate::state::AppState;

use super::owned_job;

/// Partial update by the owner or an admin. A changed address is geocoded again.
pub async fn job_update_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    SanitizedJson(body): SanitizedJson<JobRequest>,
) -> ApiResult<Job> {
    let id = parse_id(&id)?;
    let job = owned_job(&state, id, &user).await?;

    let mut changes = body.validate_changes()?;
    if let Some(address) = changes.address.as_deref() {
        if address != job.address {
            changes.location = Some(state.geocoder.geocode(address).await?);
        }
    }

    let updated = state.jobs.update(id, &changes).await?;
    Ok(ApiResponse::success(updated))
}
