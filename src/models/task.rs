use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum; wire values are the
/// uppercase tags DO, DOING, and DONE.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Not started.
    Do,
    /// In progress.
    Doing,
    /// Finished.
    Done,
}

/// One entry in a task's assignee list. Duplicates are permitted and
/// insertion order is preserved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Assignee {
    pub name: String,
    pub email: String,
}

/// Input structure for creating a task. Every field is required; a body
/// missing any of them is rejected before reaching the handler.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 50))]
    pub label: String,

    pub due_date: DateTime<Utc>,

    pub status: TaskStatus,

    /// May be empty; the list just has to be present.
    pub assigned_to: Vec<Assignee>,
}

/// Represents a task entity as stored in the `tasks` table and returned
/// by the API. The assignee list lives in a JSONB column.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub label: String,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub important: bool,
    pub assigned_to: Json<Vec<Assignee>>,
    /// Id of the owning user, set at creation and immutable afterwards.
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for a status change.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TaskStatus,
}

/// Payload for appending an assignee. Both fields required.
#[derive(Debug, Deserialize)]
pub struct AddAssigneeRequest {
    pub name: String,
    pub email: String,
}

/// Payload for removing every assignee entry matching an email.
#[derive(Debug, Deserialize)]
pub struct RemoveAssigneeRequest {
    pub email: String,
}

impl Task {
    /// Creates a new `Task` owned by `user_id`. `important` starts false
    /// and `created_at` is set here, once.
    pub fn new(input: CreateTaskRequest, user_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            label: input.label,
            due_date: input.due_date,
            status: input.status,
            important: false,
            assigned_to: Json(input.assigned_to),
            created_by: user_id,
            created_at: Utc::now(),
        }
    }
}
