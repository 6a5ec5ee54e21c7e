// handlers/protected/user/password.rs - PUT /api/v1/password/update handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{
    password::{hash_password, verify_password},
    session::token_response,
};
use crate::database::models::user::{validate_password, UpdatePasswordRequest};
use crate::error::ApiError;
use crate::middleware::{AuthUser, SanitizedJson};
use crate::state::AppState;
use crate::validation::FieldErrors;

/// Changes the password after checking the current one, then issues a fresh token.
pub async fn password_update_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    jar: CookieJar,
    SanitizedJson(body): SanitizedJson<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = body.current_password.as_deref().unwrap_or_default();
    if !verify_password(current, &user.password_hash).await? {
        return Err(ApiError::unauthorized("Old Password is incorrect"));
    }

    let mut errors = FieldErrors::new();
    let new_password = validate_password(&mut errors, "newPassword", body.new_password.as_deref());
    errors.finish()?;
    let new_password = new_password.ok_or_else(|| ApiError::field_error("newPassword", "Please enter password."))?;

    let password_hash = hash_password(new_password).await?;
    state.users.update_password(user.id, &password_hash).await?;

    tracing::info!("User {} changed password", user.id);
    token_response(jar, user.id, StatusCode::OK)
}
