// handlers/protected/user/logout.rs - GET /api/v1/logout handler

use axum::{response::IntoResponse, Extension};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::session::clear_cookie;
use crate::middleware::{ApiResponse, AuthUser};

pub async fn logout_get(Extension(AuthUser(user)): Extension<AuthUser>, jar: CookieJar) -> impl IntoResponse {
    tracing::info!("User {} logged out", user.id);
    (clear_cookie(jar), ApiResponse::message("User logout successfully"))
}
