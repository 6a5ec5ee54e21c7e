// handlers/protected/jobs/mod.rs - Job operations for signed-in users
//
// Job-seekers (role user): applied, apply
// Employers and admins: published, create, update, delete

pub mod applied;   // GET /api/v1/jobs/applied
pub mod apply;     // PUT /api/v1/job/:id/apply
pub mod create;    // POST /api/v1/job/new
pub mod delete;    // DELETE /api/v1/job/:id
pub mod published; // GET /api/v1/jobs/published
pub mod update;    // PUT /api/v1/job/:id

pub use applied::jobs_applied_get;
pub use apply::job_apply_put;
pub use create::job_new_post;
pub use delete::job_delete;
pub use published::jobs_published_get;
pub use update::job_update_put;

use uuid::Uuid;

use crate::database::models::{Job, Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Loads a job the user may modify: its owner, or any admin.
pub(crate) async fn owned_job(state: &AppState, id: Uuid, user: &User) -> Result<Job, ApiError> {
    let job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    ensure_can_modify(&job, user)?;
    Ok(job)
}

pub(crate) fn ensure_can_modify(job: &Job, user: &User) -> Result<(), ApiError> {
    if job.is_owned_by(user.id) || user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "User: {} is not allowed to update this job",
            user.id
        )))
    }
}
