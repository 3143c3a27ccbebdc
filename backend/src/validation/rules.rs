//! Custom validator rules shared by request payloads.

use validator::ValidationError;

/// Passwords must be at least 8 characters and mix letters with digits.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(ValidationError::new("password_too_short")
            .with_message("Password must be at least 8 characters".into()));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err(ValidationError::new("password_too_weak")
            .with_message("Password must contain letters and digits".into()));
    }

    Ok(())
}
