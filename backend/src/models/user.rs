//! Models that represent user accounts and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::UserId;
use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a user account.
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Login email address, unique per account.
    pub email: String,
    /// Argon2 hash of the user's password. `None` means the password was
    /// cleared by the reset flow and must be re-set before login succeeds.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Subscription tier for the account.
    pub account_type: AccountType,
    /// Currently active password-reset token, if one was requested.
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    /// Index of the selected avatar image.
    pub profile_photo: i32,
    /// Last time the account synced its tasks.
    pub last_accessed_at: DateTime<Utc>,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Supported account tiers stored in the database.
pub enum AccountType {
    #[default]
    Standard,
    Premium,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Standard => "standard",
            AccountType::Premium => "premium",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for creating a new account.
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "rules::validate_password_strength"))]
    pub password: String,
    #[serde(default)]
    pub account_type: AccountType,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Session token returned after a successful login or registration.
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for requesting a password-reset email.
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for completing a password reset with an emailed token.
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 32, message = "Invalid reset token"))]
    pub token: String,
    #[validate(custom(function = "rules::validate_password_strength"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for changing the account email address.
pub struct ChangeEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub new_email: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for switching the avatar image.
pub struct ProfilePhotoRequest {
    #[validate(range(min = 0, max = 31, message = "Unknown profile photo"))]
    pub profile_photo: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilePhotoResponse {
    pub profile_photo: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncTimeResponse {
    pub sync_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountCreatedResponse {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub account_type: String,
    pub profile_photo: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            account_type: user.account_type.as_str().to_string(),
            profile_photo: user.profile_photo,
        }
    }
}
