//! One-time password-reset token flow.
//!
//! A user has at most one active token: `NoActiveToken -> TokenIssued ->
//! NoActiveToken`. Issuing overwrites any prior token, and a successful
//! consume clears both the token and the password hash, forcing the user
//! through "set new password".

use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::AuthError;
use crate::repositories::auth_store::AuthStore;
use crate::types::UserId;
use crate::utils::api_key::generate_api_key;
use crate::utils::password::hash_password;

#[derive(Clone)]
pub struct PasswordResetFlow {
    store: Arc<dyn AuthStore>,
}

impl PasswordResetFlow {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Issues a fresh reset token for out-of-band delivery, invalidating any
    /// previously issued one. `NotFound` when the user id does not exist;
    /// the HTTP layer answers uniformly regardless.
    pub async fn request_reset(&self, user_id: UserId) -> Result<String, AuthError> {
        let token = generate_api_key()?;

        let rows = self.store.set_reset_token(user_id, &token).await?;
        if rows == 0 {
            return Err(AuthError::NotFound);
        }

        Ok(token)
    }

    /// Validates a presented token and consumes it on success.
    ///
    /// On a match the stored token and the password hash are both cleared:
    /// the token can never validate again, and login stays refused until a
    /// new password is set. On a mismatch nothing changes, so the legitimate
    /// token remains usable.
    pub async fn validate_and_consume(
        &self,
        user_id: UserId,
        presented_token: &str,
    ) -> Result<(), AuthError> {
        let stored = self
            .store
            .reset_token(user_id)
            .await?
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidResetToken)?;

        if !constant_time_eq(presented_token, &stored) {
            return Err(AuthError::InvalidResetToken);
        }

        self.store.clear_reset_token(user_id).await?;
        self.store.clear_password(user_id).await?;

        Ok(())
    }

    /// Hashes and stores a replacement password. Only meaningful after a
    /// successful [`Self::validate_and_consume`]; the caller sequences the
    /// two calls.
    pub async fn set_new_password(
        &self,
        user_id: UserId,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let hash = hash_password(new_password)?;
        self.store.set_password(user_id, &hash).await
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_matches_exactly() {
        assert!(constant_time_eq("token", "token"));
        assert!(!constant_time_eq("token", "token2"));
        assert!(!constant_time_eq("token", "Token"));
        assert!(!constant_time_eq("", "token"));
    }
}
