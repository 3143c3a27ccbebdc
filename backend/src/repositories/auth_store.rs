//! Storage interface consumed by the authentication core.
//!
//! The core never touches SQL directly; it talks to this trait so that the
//! credential flows can be exercised without a database. [`PgAuthStore`] is
//! the production implementation over the shared pool.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::error::AuthError;
use crate::models::api_key::{ApiKeyOwner, NewApiKeyRecord};
use crate::types::{ApiKeyId, UserId};

#[derive(Debug, Clone, FromRow)]
/// Minimal login view of a user row.
pub struct LoginCredentials {
    pub user_id: UserId,
    /// `None` when the password was cleared by the reset flow.
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Looks up the user id and stored password hash for an email address.
    async fn login_credentials(&self, email: &str)
        -> Result<Option<LoginCredentials>, AuthError>;

    async fn insert_api_key(&self, record: NewApiKeyRecord) -> Result<ApiKeyId, AuthError>;

    /// Resolves a key fingerprint to its owner and expiry, if any record
    /// matches.
    async fn api_key_owner(&self, fingerprint: &str) -> Result<Option<ApiKeyOwner>, AuthError>;

    /// Records key usage. Callers treat failures as non-fatal.
    async fn touch_api_key(&self, fingerprint: &str) -> Result<(), AuthError>;

    /// Deletes one key scoped to its owner, reporting the rows affected.
    async fn delete_api_key(&self, user_id: UserId, key_id: ApiKeyId) -> Result<u64, AuthError>;

    async fn delete_all_api_keys(&self, user_id: UserId) -> Result<(), AuthError>;

    /// The currently active reset token for a user, if one exists.
    async fn reset_token(&self, user_id: UserId) -> Result<Option<String>, AuthError>;

    /// Overwrites the active reset token, reporting the rows affected so a
    /// bad user id is detectable.
    async fn set_reset_token(&self, user_id: UserId, token: &str) -> Result<u64, AuthError>;

    async fn clear_reset_token(&self, user_id: UserId) -> Result<(), AuthError>;

    async fn clear_password(&self, user_id: UserId) -> Result<(), AuthError>;

    async fn set_password(&self, user_id: UserId, password_hash: &str) -> Result<(), AuthError>;

    async fn email_by_user(&self, user_id: UserId) -> Result<Option<String>, AuthError>;
}

/// Production [`AuthStore`] backed by Postgres.
#[derive(Clone)]
pub struct PgAuthStore {
    pool: DbPool,
}

impl PgAuthStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn login_credentials(
        &self,
        email: &str,
    ) -> Result<Option<LoginCredentials>, AuthError> {
        let row = sqlx::query_as::<_, LoginCredentials>(
            "SELECT id AS user_id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_api_key(&self, record: NewApiKeyRecord) -> Result<ApiKeyId, AuthError> {
        let key_id = ApiKeyId::new();

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, fingerprint, label, description, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(key_id)
        .bind(record.user_id)
        .bind(&record.fingerprint)
        .bind(&record.label)
        .bind(&record.description)
        .bind(record.expires_at)
        .bind(Utc::now())
        .execute(&*self.pool)
        .await?;

        Ok(key_id)
    }

    async fn api_key_owner(&self, fingerprint: &str) -> Result<Option<ApiKeyOwner>, AuthError> {
        let row = sqlx::query_as::<_, ApiKeyOwner>(
            "SELECT user_id, expires_at FROM api_keys WHERE fingerprint = $1",
        )
        .bind(fingerprint)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row)
    }

    async fn touch_api_key(&self, fingerprint: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE api_keys SET last_used_at = $1 WHERE fingerprint = $2")
            .bind(Utc::now())
            .bind(fingerprint)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    async fn delete_api_key(&self, user_id: UserId, key_id: ApiKeyId) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(key_id)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all_api_keys(&self, user_id: UserId) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM api_keys WHERE user_id = $1")
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    async fn reset_token(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        let token = sqlx::query_scalar::<_, Option<String>>(
            "SELECT reset_token FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(token.flatten())
    }

    async fn set_reset_token(&self, user_id: UserId, token: &str) -> Result<u64, AuthError> {
        let result = sqlx::query("UPDATE users SET reset_token = $1 WHERE id = $2")
            .bind(token)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn clear_reset_token(&self, user_id: UserId) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET reset_token = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    async fn clear_password(&self, user_id: UserId) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET password_hash = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    async fn set_password(&self, user_id: UserId, password_hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    async fn email_by_user(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(email)
    }
}
