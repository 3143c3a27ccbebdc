use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Internal error taxonomy for the authentication core.
///
/// The distinct kinds exist for logging and tests; at the HTTP boundary every
/// rejection collapses into a uniform forbidden response so a caller cannot
/// tell a missing credential from a stale or tampered one.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The system random source failed. Fatal for the operation, no retry.
    #[error("random source unavailable: {0}")]
    Entropy(String),
    /// Password hashing failed for a reason other than a mismatch.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// The session signing key could not be loaded or used.
    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),
    /// No credential, user, or token matched the presented value.
    #[error("credential not found")]
    NotFound,
    /// The credential matched but is past its validity window.
    #[error("credential expired")]
    Expired,
    /// The token parsed but its signature did not verify.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token could not be parsed at all.
    #[error("malformed token")]
    Malformed,
    /// A presented reset token did not match the stored one.
    #[error("reset token mismatch")]
    InvalidResetToken,
    /// The backing store failed; not an authentication verdict.
    #[error("auth store error: {0}")]
    Store(anyhow::Error),
}

impl AuthError {
    /// True for infrastructure failures that should surface as 500 rather
    /// than as an authentication rejection.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Entropy(_)
                | AuthError::Hashing(_)
                | AuthError::KeyUnavailable(_)
                | AuthError::Store(_)
        )
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Store(err.into())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Store(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                msg,
                "UNAUTHORIZED".to_string(),
                None,
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN".to_string(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                AppError::Conflict("Resource already exists".to_string())
            }
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_internal() {
            return AppError::InternalServerError(anyhow::anyhow!(err));
        }
        // Preserve the kind for operators, hide it from the caller.
        tracing::debug!(kind = %err, "authentication rejected");
        AppError::Forbidden("Forbidden".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let response = AppError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "bad");
        assert_eq!(json["code"], "BAD_REQUEST");

        let response = AppError::Forbidden("denied".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = response_json(response).await;
        assert_eq!(json["error"], "denied");
        assert_eq!(json["code"], "FORBIDDEN");

        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"], "missing");
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn auth_rejections_collapse_to_uniform_forbidden() {
        for err in [
            AuthError::NotFound,
            AuthError::Expired,
            AuthError::InvalidSignature,
            AuthError::Malformed,
            AuthError::InvalidResetToken,
        ] {
            let app_error = AppError::from(err);
            let response = app_error.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            let json = response_json(response).await;
            assert_eq!(json["error"], "Forbidden");
        }
    }

    #[tokio::test]
    async fn auth_infrastructure_failures_are_internal_errors() {
        let err = AuthError::Entropy("rng offline".to_string());
        assert!(err.is_internal());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn app_error_validation_includes_details() {
        let response = AppError::Validation(vec!["field: invalid".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0], "field: invalid");
    }
}
