use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Entropy carried by each raw key, before text encoding.
pub const API_KEY_BYTES: usize = 32;

/// Generates a fresh high-entropy key, URL-safe base64 encoded for transport.
/// Also used for password-reset tokens, which share the same entropy needs.
pub fn generate_api_key() -> Result<String, AuthError> {
    let mut buf = [0u8; API_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| AuthError::Entropy(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Deterministic one-way digest of a raw key, used both to store and to look
/// keys up. Keys are high-entropy, so a fast hash is sufficient here; the
/// slow password hash is reserved for low-entropy user passwords.
pub fn fingerprint(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    hex::encode(hasher.finalize())
}
