//! Account settings endpoints for the authenticated user.

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::user::{
    AccountCreatedResponse, ChangeEmailRequest, EmailResponse, ProfilePhotoRequest,
    ProfilePhotoResponse, SyncTimeResponse,
};
use crate::repositories::{task as task_repo, user as user_repo};
use crate::state::AppState;

pub async fn get_email(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<EmailResponse>, AppError> {
    let email = user_repo::email_address(&state.pool, user_id).await?;

    Ok(Json(EmailResponse { email }))
}

pub async fn change_email(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<ChangeEmailRequest>,
) -> Result<Json<EmailResponse>, AppError> {
    payload.validate()?;

    user_repo::change_email(&state.pool, user_id, &payload.new_email).await?;

    Ok(Json(EmailResponse {
        email: payload.new_email,
    }))
}

pub async fn get_profile_photo(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<ProfilePhotoResponse>, AppError> {
    let profile_photo = user_repo::profile_photo(&state.pool, user_id).await?;

    Ok(Json(ProfilePhotoResponse { profile_photo }))
}

pub async fn change_profile_photo(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<ProfilePhotoRequest>,
) -> Result<Json<ProfilePhotoResponse>, AppError> {
    payload.validate()?;

    user_repo::change_profile_photo(&state.pool, user_id, payload.profile_photo).await?;

    Ok(Json(ProfilePhotoResponse {
        profile_photo: payload.profile_photo,
    }))
}

/// Reports the previous sync time, then bumps it to now.
pub async fn sync_time(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<SyncTimeResponse>, AppError> {
    let sync_time = user_repo::last_accessed(&state.pool, user_id).await?;

    if let Err(err) = user_repo::update_last_accessed(&state.pool, user_id).await {
        tracing::warn!(error = ?err, "failed to bump last accessed");
    }

    Ok(Json(SyncTimeResponse { sync_time }))
}

pub async fn account_created_at(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<AccountCreatedResponse>, AppError> {
    let created_at = user_repo::created_at(&state.pool, user_id).await?;

    Ok(Json(AccountCreatedResponse { created_at }))
}

/// Deletes the account and everything attached to it. Tasks and API keys go
/// first so a failed user delete cannot leave orphaned credentials.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    task_repo::delete_all_tasks(&state.pool, user_id).await?;
    state.api_keys.revoke_all(user_id).await?;
    user_repo::delete_user(&state.pool, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
