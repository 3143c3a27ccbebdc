//! Issues and resolves long-lived API keys.
//!
//! Only the SHA-256 fingerprint of a key is persisted; resolution hashes the
//! presented value and does an exact-match lookup.

use chrono::Utc;
use std::sync::Arc;

use crate::error::AuthError;
use crate::models::api_key::{NewApiKeyRecord, NewApiKeyRequest};
use crate::repositories::auth_store::AuthStore;
use crate::types::{ApiKeyId, UserId};
use crate::utils::api_key::{fingerprint, generate_api_key};

#[derive(Clone)]
pub struct ApiKeyManager {
    store: Arc<dyn AuthStore>,
}

impl ApiKeyManager {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Mints a new key for `user_id`, persisting only its fingerprint.
    /// Returns the raw key (shown to the caller exactly once) and the row id.
    pub async fn issue(
        &self,
        user_id: UserId,
        request: NewApiKeyRequest,
    ) -> Result<(String, ApiKeyId), AuthError> {
        let raw_key = generate_api_key()?;

        let key_id = self
            .store
            .insert_api_key(NewApiKeyRecord {
                user_id,
                fingerprint: fingerprint(&raw_key),
                label: request.label,
                description: request.description,
                expires_at: request.expires_at,
            })
            .await?;

        Ok((raw_key, key_id))
    }

    /// Resolves a presented key to its owning user.
    ///
    /// Expired keys never resolve, even while their row still exists. Usage
    /// bookkeeping is best-effort and never fails the request.
    pub async fn resolve(&self, presented_key: &str) -> Result<UserId, AuthError> {
        let fp = fingerprint(presented_key);

        let owner = self
            .store
            .api_key_owner(&fp)
            .await?
            .ok_or(AuthError::NotFound)?;

        if let Some(expires_at) = owner.expires_at {
            if expires_at <= Utc::now() {
                return Err(AuthError::Expired);
            }
        }

        if let Err(err) = self.store.touch_api_key(&fp).await {
            tracing::warn!(error = %err, "failed to record api key usage");
        }

        Ok(owner.user_id)
    }

    /// Deletes one key. Zero rows affected means the key does not exist or
    /// belongs to someone else, and both report `NotFound`.
    pub async fn revoke(&self, user_id: UserId, key_id: ApiKeyId) -> Result<(), AuthError> {
        let rows = self.store.delete_api_key(user_id, key_id).await?;
        if rows == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    pub async fn revoke_all(&self, user_id: UserId) -> Result<(), AuthError> {
        self.store.delete_all_api_keys(user_id).await
    }
}
