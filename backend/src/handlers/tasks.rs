//! Task CRUD. Every handler is scoped to the authenticated caller; a task id
//! owned by someone else behaves exactly like a missing one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::task::{NewTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::repositories::{task as task_repo, user as user_repo};
use crate::state::AppState;
use crate::types::{TaskId, UserId};

pub async fn create_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<NewTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    payload.validate()?;

    let task = task_repo::insert_task(&state.pool, user_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let tasks = task_repo::list_all(&state.pool, user_id).await?;

    touch_sync_time(&state, user_id).await;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub async fn list_completed_tasks(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let tasks = task_repo::list_by_completion(&state.pool, user_id, true).await?;

    touch_sync_time(&state, user_id).await;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub async fn list_incomplete_tasks(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let tasks = task_repo::list_by_completion(&state.pool, user_id, false).await?;

    touch_sync_time(&state, user_id).await;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(task_id): Path<TaskId>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = task_repo::find_by_id(&state.pool, user_id, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(task_id): Path<TaskId>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    payload.validate()?;

    let task = task_repo::update_task(&state.pool, user_id, task_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

pub async fn complete_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    set_completed(&state, user_id, task_id, true).await
}

pub async fn incomplete_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    set_completed(&state, user_id, task_id, false).await
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    let rows = task_repo::delete_task(&state.pool, user_id, task_id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn set_completed(
    state: &AppState,
    user_id: UserId,
    task_id: TaskId,
    completed: bool,
) -> Result<StatusCode, AppError> {
    let rows = task_repo::set_completed(&state.pool, user_id, task_id, completed).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn touch_sync_time(state: &AppState, user_id: UserId) {
    if let Err(err) = user_repo::update_last_accessed(&state.pool, user_id).await {
        tracing::warn!(error = ?err, "failed to bump last accessed");
    }
}
