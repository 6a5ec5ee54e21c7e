// handlers/public/jobs/show.rs - GET /api/v1/job/:id/:slug handler

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Job detail, with `user` expanded to the owner's id and name.
pub async fn job_get(State(state): State<AppState>, Path((id, slug)): Path<(String, String)>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let job = state
        .jobs
        .find_by_id_and_slug(id, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    let owner = state.users.find_by_id(job.user_id).await?;
    let mut data = serde_json::to_value(&job)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to serialize job: {}", e)))?;
    data["user"] = match owner {
        Some(owner) => json!({ "id": owner.id, "name": owner.name }),
        None => json!({ "id": job.user_id }),
    };

    Ok(ApiResponse::success(data))
}
