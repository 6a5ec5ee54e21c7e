use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{session::TOKEN_COOKIE, validate_jwt};
use crate::database::models::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

pub const LOGIN_FIRST: &str = "Login first to access this resource";

/// User resolved from the request token, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Resolves the bearer token (or the `token` cookie) to a user and attaches it
/// to the request.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers(), &jar).ok_or_else(|| ApiError::unauthorized(LOGIN_FIRST))?;

    let claims = validate_jwt(&token)?;
    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("No authorization, token failed"))?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Role gate for a route group; must run inside [`jwt_auth_middleware`].
pub async fn authorize_roles(
    State(roles): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let AuthUser(user) = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized(LOGIN_FIRST))?;
    authorize(user, roles)?;
    Ok(next.run(request).await)
}

pub fn authorize(user: &User, roles: &[Role]) -> Result<(), ApiError> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Role: {} is not authorized to access this route",
            user.role
        )))
    }
}

/// Bearer header first, then the session cookie
fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().trim())
        .filter(|t| !t.is_empty() && *t != "none")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role,
            password_hash: String::new(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer from-header"));
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "from-cookie"));
        assert_eq!(extract_token(&headers, &jar).as_deref(), Some("from-header"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "from-cookie"));
        assert_eq!(extract_token(&HeaderMap::new(), &jar).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn blank_or_malformed_tokens_are_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers, &CookieJar::new()).is_none());

        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "none"));
        assert!(extract_token(&headers, &jar).is_none());
    }

    #[test]
    fn role_gate_names_the_rejected_role() {
        assert!(authorize(&user(Role::Employer), &[Role::Employer, Role::Admin]).is_ok());

        let err = authorize(&user(Role::User), &[Role::Employer, Role::Admin]).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), "Role: user is not authorized to access this route");
    }
}
