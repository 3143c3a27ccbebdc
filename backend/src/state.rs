use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::repositories::auth_store::{AuthStore, PgAuthStore};
use crate::services::api_keys::ApiKeyManager;
use crate::services::password_reset::PasswordResetFlow;
use crate::utils::jwt::SigningKeys;

/// Shared application state. Cheap to clone; everything inside is either an
/// `Arc` or a handle around one.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub keys: Arc<SigningKeys>,
    pub store: Arc<dyn AuthStore>,
    pub api_keys: ApiKeyManager,
    pub password_reset: PasswordResetFlow,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, keys: SigningKeys) -> Self {
        let store: Arc<dyn AuthStore> = Arc::new(PgAuthStore::new(pool.clone()));
        Self::with_store(pool, config, keys, store)
    }

    /// Builds state around an arbitrary store implementation. Production
    /// always uses [`PgAuthStore`]; tests substitute an in-memory one.
    pub fn with_store(
        pool: DbPool,
        config: Config,
        keys: SigningKeys,
        store: Arc<dyn AuthStore>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            keys: Arc::new(keys),
            api_keys: ApiKeyManager::new(store.clone()),
            password_reset: PasswordResetFlow::new(store.clone()),
            store,
        }
    }
}
