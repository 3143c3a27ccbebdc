//! Registration, login, and the password-reset entry points.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AuthError};
use crate::models::user::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, SessionResponse,
    UserResponse,
};
use crate::repositories::user as user_repo;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::jwt::issue_session_token;
use crate::utils::password::{hash_password, verify_password};

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;

    // A duplicate email surfaces as a unique violation and maps to 409.
    let user = user_repo::create_user(
        &state.pool,
        &payload.email,
        &password_hash,
        payload.account_type,
    )
    .await?;

    let token = issue_session_token(&state.keys, user.id, state.config.session_lifetime_hours)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;

    let credentials = state
        .store
        .login_credentials(&payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    // A cleared hash means a reset consumed the old password; login stays
    // refused until a new one is set.
    let hash = credentials.password_hash.ok_or_else(|| {
        AppError::Unauthorized("Password reset pending; set a new password".to_string())
    })?;

    if !verify_password(&payload.password, &hash) {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let user = user_repo::find_by_id(&state.pool, credentials.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let token = issue_session_token(&state.keys, user.id, state.config.session_lifetime_hours)?;

    if let Err(err) = user_repo::update_last_accessed(&state.pool, user.id).await {
        tracing::warn!(error = ?err, "failed to bump last accessed on login");
    }

    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Starts the reset flow. The response never reveals whether the address has
/// an account; all failures past validation are logged and swallowed.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    if let Some(credentials) = state.store.login_credentials(&payload.email).await? {
        match state.password_reset.request_reset(credentials.user_id).await {
            Ok(token) => send_reset_email(&payload.email, &token),
            Err(err) => tracing::warn!(error = %err, "failed to issue reset token"),
        }
    }

    Ok(Json(json!({
        "message": "If the address exists, a reset email has been sent"
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let credentials = state
        .store
        .login_credentials(&payload.email)
        .await?
        .ok_or(AuthError::InvalidResetToken)?;

    state
        .password_reset
        .validate_and_consume(credentials.user_id, &payload.token)
        .await?;

    state
        .password_reset
        .set_new_password(credentials.user_id, &payload.new_password)
        .await?;

    Ok(Json(json!({ "message": "Password updated" })))
}

fn send_reset_email(to_email: &str, token: &str) {
    let result = EmailService::new().and_then(|mailer| {
        mailer.send_password_reset_email(to_email, token)
    });
    if let Err(err) = result {
        tracing::warn!(error = %err, "failed to send password reset email");
    }
}
