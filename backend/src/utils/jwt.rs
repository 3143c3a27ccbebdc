use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::AuthError;
use crate::types::UserId;

/// ES256 key material for session tokens.
///
/// Loaded once at startup and shared read-only for the process lifetime; the
/// private key never leaves this struct.
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys").finish_non_exhaustive()
    }
}

impl SigningKeys {
    /// Reads the keypair from PEM files on disk.
    pub fn load(private_key_path: &str, public_key_path: &str) -> Result<Self, AuthError> {
        let private_pem = fs::read(private_key_path)
            .map_err(|e| AuthError::KeyUnavailable(format!("{}: {}", private_key_path, e)))?;
        let public_pem = fs::read(public_key_path)
            .map_err(|e| AuthError::KeyUnavailable(format!("{}: {}", public_key_path, e)))?;
        Self::from_pem(&private_pem, &public_pem)
    }

    /// Builds the keypair from in-memory PEM bytes.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AuthError> {
        let encoding = EncodingKey::from_ec_pem(private_pem)
            .map_err(|e| AuthError::KeyUnavailable(e.to_string()))?;
        let decoding = DecodingKey::from_ec_pem(public_pem)
            .map_err(|e| AuthError::KeyUnavailable(e.to_string()))?;
        Ok(Self { encoding, decoding })
    }

    /// Signs an arbitrary claims set. Prefer [`issue_session_token`] outside
    /// of tests.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::ES256), claims, &self.encoding)
            .map_err(|e| AuthError::KeyUnavailable(e.to_string()))
    }

    /// Checks signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::ES256);
        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(classify_error)?;
        Ok(token_data.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token asserts.
    pub sub: String,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: UserId, lifetime_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(lifetime_hours as i64);
        Self::with_timestamps(user_id, now.timestamp(), exp.timestamp())
    }

    pub fn with_timestamps(user_id: UserId, iat: i64, exp: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat,
            exp,
        }
    }
}

/// Mints a signed session token asserting `user_id` for `lifetime_hours`.
pub fn issue_session_token(
    keys: &SigningKeys,
    user_id: UserId,
    lifetime_hours: u64,
) -> Result<String, AuthError> {
    keys.sign(&Claims::new(user_id, lifetime_hours))
}

/// Validates a presented token and extracts the user id claim.
pub fn verify_session_token(keys: &SigningKeys, token: &str) -> Result<UserId, AuthError> {
    let claims = keys.verify(token)?;
    claims.sub.parse().map_err(|_| AuthError::Malformed)
}

fn classify_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidEcdsaKey => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_PEM: &str = include_str!("../../tests/fixtures/es256_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../tests/fixtures/es256_public.pem");

    fn test_keys() -> SigningKeys {
        SigningKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).expect("load keys")
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let keys = test_keys();
        let user_id = UserId::new();
        let token = issue_session_token(&keys, user_id, 1).expect("issue");
        assert_eq!(token.split('.').count(), 3);
        let verified = verify_session_token(&keys, &token).expect("verify");
        assert_eq!(verified, user_id);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let keys = test_keys();
        let now = Utc::now().timestamp();
        let claims = Claims::with_timestamps(UserId::new(), now - 7200, now - 3600);
        let token = keys.sign(&claims).expect("sign");
        let err = verify_session_token(&keys, &token).expect_err("must fail");
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn tampered_signature_is_rejected_as_invalid() {
        let keys = test_keys();
        let token = issue_session_token(&keys, UserId::new(), 1).expect("issue");
        let (head, signature) = token.rsplit_once('.').expect("three segments");
        // Flip one character in the middle of the signature segment.
        let mut sig: Vec<u8> = signature.bytes().collect();
        let mid = sig.len() / 2;
        sig[mid] = if sig[mid] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", head, String::from_utf8(sig).expect("utf8"));
        let err = verify_session_token(&keys, &tampered).expect_err("must fail");
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_token_is_rejected_as_malformed() {
        let keys = test_keys();
        for junk in ["", "abc", "a.b", "not even close"] {
            let err = verify_session_token(&keys, junk).expect_err("must fail");
            assert!(matches!(err, AuthError::Malformed), "input {:?}", junk);
        }
    }

    #[test]
    fn load_with_missing_files_reports_key_unavailable() {
        let err = SigningKeys::load("/nonexistent/private.pem", "/nonexistent/public.pem")
            .expect_err("must fail");
        assert!(matches!(err, AuthError::KeyUnavailable(_)));
    }
}
