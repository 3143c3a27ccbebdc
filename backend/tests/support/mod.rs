//! Shared test fixtures: an in-memory credential store and app state that
//! never touches a real database.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tasknest_backend::config::Config;
use tasknest_backend::error::AuthError;
use tasknest_backend::models::api_key::{ApiKeyOwner, NewApiKeyRecord};
use tasknest_backend::repositories::auth_store::{AuthStore, LoginCredentials};
use tasknest_backend::state::AppState;
use tasknest_backend::types::{ApiKeyId, UserId};
use tasknest_backend::utils::jwt::SigningKeys;
use tasknest_backend::utils::password::hash_password;

const PRIVATE_PEM: &str = include_str!("../fixtures/es256_private.pem");
const PUBLIC_PEM: &str = include_str!("../fixtures/es256_public.pem");

pub fn signing_keys() -> SigningKeys {
    SigningKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).expect("load test keys")
}

#[derive(Default)]
struct UserRecord {
    email: String,
    password_hash: Option<String>,
    reset_token: Option<String>,
}

struct KeyRecord {
    id: ApiKeyId,
    user_id: UserId,
    expires_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, UserRecord>,
    // keyed by fingerprint
    keys: HashMap<String, KeyRecord>,
}

/// In-memory [`AuthStore`] with the same observable behavior as the
/// Postgres one.
#[derive(Default)]
pub struct InMemoryAuthStore {
    inner: Mutex<Inner>,
}

impl InMemoryAuthStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seeds a user with a hashed password, returning the new id.
    pub fn add_user(&self, email: &str, password: &str) -> UserId {
        let user_id = UserId::new();
        let hash = hash_password(password).expect("hash test password");
        self.inner.lock().expect("lock").users.insert(
            user_id,
            UserRecord {
                email: email.to_string(),
                password_hash: Some(hash),
                reset_token: None,
            },
        );
        user_id
    }

    pub fn stored_password_hash(&self, user_id: UserId) -> Option<String> {
        self.inner
            .lock()
            .expect("lock")
            .users
            .get(&user_id)
            .and_then(|u| u.password_hash.clone())
    }

    pub fn stored_reset_token(&self, user_id: UserId) -> Option<String> {
        self.inner
            .lock()
            .expect("lock")
            .users
            .get(&user_id)
            .and_then(|u| u.reset_token.clone())
    }

    pub fn key_last_used(&self, fingerprint: &str) -> Option<DateTime<Utc>> {
        self.inner
            .lock()
            .expect("lock")
            .keys
            .get(fingerprint)
            .and_then(|k| k.last_used_at)
    }
}

#[async_trait]
impl AuthStore for InMemoryAuthStore {
    async fn login_credentials(
        &self,
        email: &str,
    ) -> Result<Option<LoginCredentials>, AuthError> {
        let inner = self.inner.lock().expect("lock");
        Ok(inner.users.iter().find(|(_, u)| u.email == email).map(
            |(id, u)| LoginCredentials {
                user_id: *id,
                password_hash: u.password_hash.clone(),
            },
        ))
    }

    async fn insert_api_key(&self, record: NewApiKeyRecord) -> Result<ApiKeyId, AuthError> {
        let key_id = ApiKeyId::new();
        self.inner.lock().expect("lock").keys.insert(
            record.fingerprint,
            KeyRecord {
                id: key_id,
                user_id: record.user_id,
                expires_at: record.expires_at,
                last_used_at: None,
            },
        );
        Ok(key_id)
    }

    async fn api_key_owner(&self, fingerprint: &str) -> Result<Option<ApiKeyOwner>, AuthError> {
        let inner = self.inner.lock().expect("lock");
        Ok(inner.keys.get(fingerprint).map(|k| ApiKeyOwner {
            user_id: k.user_id,
            expires_at: k.expires_at,
        }))
    }

    async fn touch_api_key(&self, fingerprint: &str) -> Result<(), AuthError> {
        if let Some(key) = self.inner.lock().expect("lock").keys.get_mut(fingerprint) {
            key.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_api_key(&self, user_id: UserId, key_id: ApiKeyId) -> Result<u64, AuthError> {
        let mut inner = self.inner.lock().expect("lock");
        let before = inner.keys.len();
        inner
            .keys
            .retain(|_, k| !(k.id == key_id && k.user_id == user_id));
        Ok((before - inner.keys.len()) as u64)
    }

    async fn delete_all_api_keys(&self, user_id: UserId) -> Result<(), AuthError> {
        self.inner
            .lock()
            .expect("lock")
            .keys
            .retain(|_, k| k.user_id != user_id);
        Ok(())
    }

    async fn reset_token(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        Ok(self
            .inner
            .lock()
            .expect("lock")
            .users
            .get(&user_id)
            .and_then(|u| u.reset_token.clone()))
    }

    async fn set_reset_token(&self, user_id: UserId, token: &str) -> Result<u64, AuthError> {
        let mut inner = self.inner.lock().expect("lock");
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.reset_token = Some(token.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn clear_reset_token(&self, user_id: UserId) -> Result<(), AuthError> {
        if let Some(user) = self.inner.lock().expect("lock").users.get_mut(&user_id) {
            user.reset_token = None;
        }
        Ok(())
    }

    async fn clear_password(&self, user_id: UserId) -> Result<(), AuthError> {
        if let Some(user) = self.inner.lock().expect("lock").users.get_mut(&user_id) {
            user.password_hash = None;
        }
        Ok(())
    }

    async fn set_password(&self, user_id: UserId, password_hash: &str) -> Result<(), AuthError> {
        if let Some(user) = self.inner.lock().expect("lock").users.get_mut(&user_id) {
            user.password_hash = Some(password_hash.to_string());
        }
        Ok(())
    }

    async fn email_by_user(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        Ok(self
            .inner
            .lock()
            .expect("lock")
            .users
            .get(&user_id)
            .map(|u| u.email.clone()))
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost:5432/tasknest_test".to_string(),
        bind_port: 0,
        jwt_private_key_path: "unused".to_string(),
        jwt_public_key_path: "unused".to_string(),
        session_lifetime_hours: 1,
    }
}

/// App state wired to the in-memory store. The pool is lazy and never
/// connected; tests that go through it belong in a database suite.
pub fn test_state(store: Arc<InMemoryAuthStore>) -> AppState {
    let pool = PgPool::connect_lazy(&test_config().database_url).expect("lazy pool");
    AppState::with_store(Arc::new(pool), test_config(), signing_keys(), store)
}
