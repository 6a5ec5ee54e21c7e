// handlers/public/auth/password.rs - Password recovery
//
// POST /api/v1/password/forgot       - mail a one-time reset link
// POST /api/v1/password/reset/:token - set a new password with that link

use axum::{
    extract::{Host, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{
    password::{hash_password, hash_reset_token, ResetToken},
    session::token_response,
};
use crate::config;
use crate::database::models::user::{validate_password, ForgotPasswordRequest, ResetPasswordRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SanitizedJson};
use crate::services::Email;
use crate::state::AppState;
use crate::validation::FieldErrors;

pub async fn forgot_password_post(
    State(state): State<AppState>,
    Host(host): Host,
    SanitizedJson(body): SanitizedJson<ForgotPasswordRequest>,
) -> ApiResult<()> {
    let email = body.email.as_deref().map(str::trim).unwrap_or_default();
    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let reset = ResetToken::generate();
    state.users.set_reset_token(user.id, Some((&reset.hash, reset.expires_at))).await?;

    let reset_url = format!("{}://{}/api/v1/password/reset/{}", scheme(), host, reset.token);
    if let Err(e) = state.mailer.send(&Email::password_reset(&user.email, &reset_url)).await {
        warn!("Reset mail to user {} failed, clearing token", user.id);
        state.users.set_reset_token(user.id, None).await?;
        return Err(e.into());
    }

    info!("Password reset requested for user {}", user.id);
    Ok(ApiResponse::message(format!("Email sent successfully to {}", user.email)))
}

pub async fn reset_password_post(
    State(state): State<AppState>,
    Path(token): Path<String>,
    jar: CookieJar,
    SanitizedJson(body): SanitizedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_reset_token(&hash_reset_token(&token), Utc::now())
        .await?
        .ok_or_else(|| ApiError::validation_error("Reset password token is invalid", None))?;

    let mut errors = FieldErrors::new();
    let password = validate_password(&mut errors, "password", body.password.as_deref());
    errors.finish()?;
    let password = password.ok_or_else(|| ApiError::field_error("password", "Please enter password."))?;

    let password_hash = hash_password(password).await?;
    state.users.update_password(user.id, &password_hash).await?;

    info!("Password reset for user {}", user.id);
    token_response(jar, user.id, StatusCode::OK)
}

fn scheme() -> &'static str {
    if config::config().security.require_https {
        "https"
    } else {
        "http"
    }
}
