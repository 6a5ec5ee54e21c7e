// handlers/protected/user/profile.rs - Profile of the signed-in user

use axum::{extract::State, response::IntoResponse, Extension};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::session::clear_cookie;
use crate::database::models::user::UpdateProfileRequest;
use crate::database::models::{Profile, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, SanitizedJson};
use crate::state::AppState;

/// GET /api/v1/me - the account plus titles and posting dates of its jobs
pub async fn me_get(State(state): State<AppState>, Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<Profile> {
    let jobs_posted = state.users.posted_jobs(user.id).await?;
    Ok(ApiResponse::success(Profile { user, jobs_posted }))
}

/// PUT /api/v1/me/update - name and email only
pub async fn me_update_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    SanitizedJson(body): SanitizedJson<UpdateProfileRequest>,
) -> ApiResult<User> {
    let (name, email) = body.validate()?;
    let updated = state.users.update_profile(user.id, name.as_deref(), email.as_deref()).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/v1/me/delete - removes the account with its jobs and applications
pub async fn me_delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    delete_account(&state, &user).await?;
    Ok((clear_cookie(jar), ApiResponse::message("Your account has been deleted")))
}

/// Deletes the user row (jobs and applications cascade) and then, in the
/// background, every resume file that belonged to those applications.
pub async fn delete_account(state: &AppState, user: &User) -> Result<(), ApiError> {
    let resumes = state.jobs.resumes_for_account(user.id).await?;
    if !state.users.delete(user.id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!("Deleted {} account {} ({} resumes)", user.role, user.id, resumes.len());
    state.resumes.remove_detached(resumes);
    Ok(())
}
