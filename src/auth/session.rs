use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub success: bool,
    pub token: String,
}

/// Issues a token for the user and returns it both as an HTTP-only cookie and
/// in the JSON body.
pub fn token_response(
    jar: CookieJar,
    user_id: Uuid,
    status: StatusCode,
) -> Result<(StatusCode, CookieJar, Json<TokenBody>), ApiError> {
    let token = super::generate_jwt(user_id)?;
    let jar = jar.add(session_cookie(token.clone()));
    Ok((status, jar, Json(TokenBody { success: true, token })))
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    let security = &config::config().security;
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(security.require_https)
        .max_age(time::Duration::days(security.cookie_expiry_days))
        .build()
}

/// Overwrites the token cookie with an empty, already expired one.
pub fn clear_cookie(jar: CookieJar) -> CookieJar {
    let expired = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build();
    jar.add(expired)
}
