// handlers/public/auth/register.rs - POST /api/v1/register handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use crate::auth::{password::hash_password, session::token_response};
use crate::database::models::user::RegisterRequest;
use crate::error::ApiError;
use crate::middleware::SanitizedJson;
use crate::state::AppState;

/// Creates an account (role `user` unless `employer` is asked for) and signs it in.
///
/// Responds 201 with `{success, token}` and the `token` cookie. A taken email is
/// a 409 "Duplicate email entered".
pub async fn register_post(
    State(state): State<AppState>,
    jar: CookieJar,
    SanitizedJson(body): SanitizedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = body.validate()?;
    let password_hash = hash_password(&new_user.password).await?;
    let user = state.users.create(&new_user, &password_hash).await?;

    info!("Registered {} account {}", user.role, user.id);
    token_response(jar, user.id, StatusCode::CREATED)
}
