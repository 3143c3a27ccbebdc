//! Models for API keys. Only the fingerprint of a key is ever persisted;
//! the raw key is shown exactly once, in the issuance response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{ApiKeyId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Key metadata listed back to its owner. The fingerprint stays server-side.
pub struct ApiKeyMetadata {
    pub id: ApiKeyId,
    pub label: String,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Payload for issuing a new API key.
pub struct NewApiKeyRequest {
    #[validate(length(min = 1, max = 100, message = "Label must be 1-100 characters"))]
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
/// Issuance response carrying the raw key and its id so the caller can
/// immediately revoke it if needed.
pub struct ApiKeyResponse {
    pub key: String,
    pub id: ApiKeyId,
}

#[derive(Debug, Clone, FromRow)]
/// Resolution result for a presented key: who owns it and when it lapses.
pub struct ApiKeyOwner {
    pub user_id: UserId,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
/// Fields persisted when a new key is issued.
pub struct NewApiKeyRecord {
    pub user_id: UserId,
    pub fingerprint: String,
    pub label: String,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
