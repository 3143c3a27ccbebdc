//! Request authorization gate.
//!
//! Two route groups, two credential shapes. Bearer routes expect
//! `Authorization: Bearer <jwt>`; API-key routes expect the raw key as the
//! whole header value. Either way the resolved [`AuthUser`] is attached as a
//! request extension and handlers never see the credential itself.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AuthError};
use crate::state::AppState;
use crate::types::UserId;
use crate::utils::jwt::verify_session_token;

/// Identity of the authenticated caller, attached by the gate middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// Verifies a bearer session token and attaches the caller's identity.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = bearer_header(&request)?;

    // Case-sensitive prefix, exactly one space. Anything else is rejected.
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Malformed)?;

    let user_id = verify_session_token(&state.keys, token)?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

/// Resolves a raw API key (the whole `Authorization` value, no prefix) to its
/// owning user and attaches the caller's identity.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = bearer_header(&request)?;

    let user_id = state.api_keys.resolve(presented).await?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

fn bearer_header(request: &Request) -> Result<&str, AuthError> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::Malformed)
}
