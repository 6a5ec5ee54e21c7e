// handlers/protected/jobs/apply.rs - PUT /api/v1/job/:id/apply handler

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    Extension,
};
use chrono::Utc;

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::uploads::stored_name;
use crate::services::UploadError;
use crate::state::AppState;

/// Applies to a job with a resume sent as multipart field `file`.
///
/// Checks run in order: job exists, deadline not passed, not applied before,
/// file present with an allowed type and size. Responds with the stored file name.
pub async fn job_apply_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<String> {
    let id = parse_id(&id)?;
    let job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.is_closed(Utc::now()) {
        return Err(ApiError::validation_error(
            "You cannot apply to this job, Last date has expired",
            None,
        ));
    }
    if state.jobs.has_applied(job.id, user.id).await? {
        return Err(ApiError::conflict("You have already applied to this job"));
    }

    let mut multipart = multipart.map_err(|_| UploadError::Missing)?;
    let (file_name, bytes) = read_file_field(&mut multipart).await?.ok_or(UploadError::Missing)?;
    let ext = state.resumes.validate(&file_name, bytes.len())?;

    let resume = stored_name(user.id, &user.name, job.id, ext);
    state.resumes.save(&resume, &bytes).await?;

    match state.jobs.add_application(job.id, user.id, &resume).await {
        Ok(_) => {}
        Err(DatabaseError::Duplicate(_)) => {
            // Lost a race with a concurrent apply; the winner owns the file now.
            return Err(ApiError::conflict("You have already applied to this job"));
        }
        Err(e) => {
            state.resumes.remove_detached(vec![resume]);
            return Err(e.into());
        }
    }

    tracing::info!("User {} applied to job {}", user.id, job.id);
    Ok(ApiResponse::success(resume).with_message("Applied to Job successfully"))
}

/// Name and contents of the `file` field, if the form has one
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some((file_name, bytes)));
    }
    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge.into()
    } else {
        ApiError::upload_rejected(err.body_text())
    }
}
