//! API-key lifecycle endpoints. Issuance is the only place the raw key is
//! ever returned.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::error::{AppError, AuthError};
use crate::middleware::auth::AuthUser;
use crate::models::api_key::{ApiKeyMetadata, ApiKeyResponse, NewApiKeyRequest};
use crate::repositories::api_key as api_key_repo;
use crate::state::AppState;
use crate::types::ApiKeyId;

pub async fn issue_key(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<NewApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), AppError> {
    payload.validate()?;

    let (key, id) = state.api_keys.issue(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(ApiKeyResponse { key, id })))
}

pub async fn list_keys(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<ApiKeyMetadata>>, AppError> {
    let keys = api_key_repo::list_metadata(&state.pool, user_id).await?;

    Ok(Json(keys))
}

pub async fn revoke_key(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(key_id): Path<ApiKeyId>,
) -> Result<StatusCode, AppError> {
    state
        .api_keys
        .revoke(user_id, key_id)
        .await
        .map_err(|err| match err {
            AuthError::NotFound => AppError::NotFound("API key not found".to_string()),
            other => other.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_all_keys(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.api_keys.revoke_all(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
