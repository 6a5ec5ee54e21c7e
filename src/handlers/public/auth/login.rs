// handlers/public/auth/login.rs - POST /api/v1/login handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use crate::auth::{password::verify_password, session::token_response};
use crate::database::models::user::LoginRequest;
use crate::error::ApiError;
use crate::middleware::SanitizedJson;
use crate::state::AppState;

/// Exchanges email and password for a token (body and cookie). Unknown email and
/// wrong password give the same 401 so accounts cannot be probed.
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    SanitizedJson(body): SanitizedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let password = body.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Please enter email and password"));
    };

    let Some(user) = state.users.find_by_email(email).await? else {
        debug!("Login for unknown email");
        return Err(ApiError::unauthorized("Invalid Credentials"));
    };
    if !verify_password(password, &user.password_hash).await? {
        debug!("Login with wrong password for {}", user.id);
        return Err(ApiError::unauthorized("Invalid Credentials"));
    }

    info!("User {} logged in", user.id);
    token_response(jar, user.id, StatusCode::OK)
}
