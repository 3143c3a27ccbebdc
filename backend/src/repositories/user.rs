use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::user::{AccountType, User};
use crate::types::UserId;

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    account_type: AccountType,
) -> Result<User, AppError> {
    let user_id = UserId::new();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, account_type, profile_photo, last_accessed_at, created_at)
        VALUES ($1, $2, $3, $4, 0, $5, $5)
        RETURNING id, email, password_hash, account_type, reset_token, profile_photo, last_accessed_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(password_hash)
    .bind(account_type)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: UserId) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, account_type, reset_token, profile_photo, \
         last_accessed_at, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn email_address(pool: &PgPool, user_id: UserId) -> Result<String, AppError> {
    let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(email)
}

pub async fn change_email(
    pool: &PgPool,
    user_id: UserId,
    new_email: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET email = $1 WHERE id = $2")
        .bind(new_email)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

pub async fn profile_photo(pool: &PgPool, user_id: UserId) -> Result<i32, AppError> {
    let photo = sqlx::query_scalar::<_, i32>("SELECT profile_photo FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(photo)
}

pub async fn change_profile_photo(
    pool: &PgPool,
    user_id: UserId,
    profile_photo: i32,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET profile_photo = $1 WHERE id = $2")
        .bind(profile_photo)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

pub async fn last_accessed(pool: &PgPool, user_id: UserId) -> Result<DateTime<Utc>, AppError> {
    let when =
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT last_accessed_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(when)
}

/// Bumps the sync timestamp. Best-effort at call sites: a failure here must
/// never fail the surrounding request.
pub async fn update_last_accessed(pool: &PgPool, user_id: UserId) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET last_accessed_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn created_at(pool: &PgPool, user_id: UserId) -> Result<DateTime<Utc>, AppError> {
    let when = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT created_at FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(when)
}

pub async fn delete_user(pool: &PgPool, user_id: UserId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}
