// handlers/elevated/users/delete.rs - DELETE /api/v1/user/:id handler

use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::handlers::protected::user::profile::delete_account;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn user_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    delete_account(&state, &user).await?;
    Ok(ApiResponse::message("Account has been deleted"))
}
