use sqlx::PgPool;

use crate::error::AppError;
use crate::models::api_key::ApiKeyMetadata;
use crate::types::UserId;

pub async fn list_metadata(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Vec<ApiKeyMetadata>, AppError> {
    let keys = sqlx::query_as::<_, ApiKeyMetadata>(
        "SELECT id, label, description, expires_at, last_used_at, created_at \
         FROM api_keys WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(keys)
}
