use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::subtask::SubtaskSummary;
use crate::models::tag::TagSummary;

/// Status of a task. Corresponds to the `task_status` SQL enum.
///
/// Input normalization is case-insensitive ("completed" → `Completed`);
/// the canonical stored and serialized form is upper-case.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "COMPLETED" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

/// A task entity as stored and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Owner of the task; every read and write is scoped to this user.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. `status` arrives as a free-form string and
/// is normalized by the handler; omitted means PENDING.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub status: Option<String>,
}

/// Partial payload for updating a task; only supplied fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskUpdateInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
}

/// A task together with its attached tags and subtasks, as returned by the
/// list and detail endpoints.
#[derive(Debug, Serialize)]
pub struct TaskWithRelations {
    #[serde(flatten)]
    pub task: Task,
    pub tags: Vec<TagSummary>,
    pub subtasks: Vec<SubtaskSummary>,
}

/// Minimal task reference (`{id, title}`) embedded in tag and subtask views.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TaskRef {
    pub id: i32,
    pub title: String,
}
