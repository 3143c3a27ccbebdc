use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_port: u16,
    /// Path to the ES256 private key (PKCS#8 PEM) used to sign session tokens.
    pub jwt_private_key_path: String,
    /// Path to the matching public key (SPKI PEM) used to verify them.
    pub jwt_public_key_path: String,
    pub session_lifetime_hours: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/tasknest".to_string());

        let bind_port = env::var("BIND_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| anyhow!("Invalid BIND_PORT value"))?;

        let jwt_private_key_path = env::var("JWT_PRIVATE_KEY_PATH")
            .unwrap_or_else(|_| "./keys/es256-private.pem".to_string());

        let jwt_public_key_path = env::var("JWT_PUBLIC_KEY_PATH")
            .unwrap_or_else(|_| "./keys/es256-public.pem".to_string());

        let session_lifetime_hours = env::var("SESSION_LIFETIME_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        Ok(Config {
            database_url,
            bind_port,
            jwt_private_key_path,
            jwt_public_key_path,
            session_lifetime_hours,
        })
    }
}
