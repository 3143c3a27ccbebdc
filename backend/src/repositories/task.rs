use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::task::{NewTaskRequest, Task, UpdateTaskRequest};
use crate::types::{TaskId, UserId};

const TASK_COLUMNS: &str =
    "id, user_id, title, body, due_at, priority, completed, completed_at, created_at";

pub async fn insert_task(
    pool: &PgPool,
    user_id: UserId,
    payload: &NewTaskRequest,
) -> Result<Task, AppError> {
    let task_id = TaskId::new();

    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (id, user_id, title, body, due_at, priority, completed, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
        RETURNING id, user_id, title, body, due_at, priority, completed, completed_at, created_at
        "#,
    )
    .bind(task_id)
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.body)
    .bind(payload.due_at)
    .bind(payload.priority)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(task)
}

pub async fn list_all(pool: &PgPool, user_id: UserId) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn list_by_completion(
    pool: &PgPool,
    user_id: UserId,
    completed: bool,
) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND completed = $2 \
         ORDER BY created_at DESC",
    ))
    .bind(user_id)
    .bind(completed)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: UserId,
    task_id: TaskId,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2",
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

pub async fn update_task(
    pool: &PgPool,
    user_id: UserId,
    task_id: TaskId,
    payload: &UpdateTaskRequest,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET title = COALESCE($1, title),
            body = COALESCE($2, body),
            due_at = COALESCE($3, due_at),
            priority = COALESCE($4, priority)
        WHERE id = $5 AND user_id = $6
        RETURNING id, user_id, title, body, due_at, priority, completed, completed_at, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.body)
    .bind(payload.due_at)
    .bind(payload.priority)
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

pub async fn set_completed(
    pool: &PgPool,
    user_id: UserId,
    task_id: TaskId,
    completed: bool,
) -> Result<u64, AppError> {
    let completed_at = completed.then(Utc::now);

    let result = sqlx::query(
        "UPDATE tasks SET completed = $1, completed_at = $2 WHERE id = $3 AND user_id = $4",
    )
    .bind(completed)
    .bind(completed_at)
    .bind(task_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_task(
    pool: &PgPool,
    user_id: UserId,
    task_id: TaskId,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_all_tasks(pool: &PgPool, user_id: UserId) -> Result<(), AppError> {
    sqlx::query("DELETE FROM tasks WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
