//! Models for tasks and their request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{TaskId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a task.
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub due_at: Option<DateTime<Utc>>,
    /// 1 = highest, 3 = lowest.
    pub priority: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for creating a new task.
pub struct NewTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 3, message = "Priority must be 1-3"))]
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    3
}

#[derive(Debug, Serialize, Deserialize, Validate)]
/// Payload for editing an existing task. Absent fields are left unchanged.
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub body: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 3, message = "Priority must be 1-3"))]
    pub priority: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of a task returned by the API.
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub body: String,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            body: task.body,
            due_at: task.due_at,
            priority: task.priority,
            completed: task.completed,
            completed_at: task.completed_at,
            created_at: task.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults_priority() {
        let payload: NewTaskRequest =
            serde_json::from_str(r#"{"title": "water the plants"}"#).expect("deserialize");
        assert_eq!(payload.priority, 3);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn new_task_rejects_empty_title() {
        let payload: NewTaskRequest =
            serde_json::from_str(r#"{"title": ""}"#).expect("deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_task_rejects_out_of_range_priority() {
        let payload: NewTaskRequest =
            serde_json::from_str(r#"{"title": "t", "priority": 9}"#).expect("deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn task_response_hides_owner() {
        let task = Task {
            id: TaskId::new(),
            user_id: UserId::new(),
            title: "t".into(),
            body: String::new(),
            due_at: None,
            priority: 3,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(TaskResponse::from(task)).expect("serialize");
        assert!(json.get("user_id").is_none());
    }
}
