use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::task::TaskRef;

/// A subtask as stored and returned by the API.
/// Owned by exactly one task and removed with it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Subtask {
    pub id: i32,
    pub task_id: i32,
    pub title: String,
    pub completed: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a subtask under a task.
#[derive(Debug, Deserialize, Validate)]
pub struct SubtaskInput {
    #[validate(length(min = 3, message = "title must be at least 3 characters"))]
    pub title: String,
    pub completed: Option<bool>,
    pub position: Option<i32>,
}

/// Partial payload for updating a subtask.
#[derive(Debug, Deserialize, Validate)]
pub struct SubtaskUpdateInput {
    #[validate(length(min = 3, message = "title must be at least 3 characters"))]
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub position: Option<i32>,
}

/// Subtask summary embedded in task views.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SubtaskSummary {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub position: i32,
}

/// A subtask together with its parent task reference, as returned by
/// `GET /subtasks/{id}`.
#[derive(Debug, Serialize)]
pub struct SubtaskWithTask {
    #[serde(flatten)]
    pub subtask: Subtask,
    pub task: TaskRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtask_input_validation() {
        let valid = SubtaskInput {
            title: "Criar modelos".to_string(),
            completed: None,
            position: None,
        };
        assert!(valid.validate().is_ok());

        let short_title = SubtaskInput {
            title: "ab".to_string(),
            completed: Some(false),
            position: Some(0),
        };
        assert!(short_title.validate().is_err());
    }

    #[test]
    fn test_update_input_allows_partial_payload() {
        let only_position = SubtaskUpdateInput {
            title: None,
            completed: None,
            position: Some(3),
        };
        assert!(only_position.validate().is_ok());

        let short_title = SubtaskUpdateInput {
            title: Some("ab".to_string()),
            completed: None,
            position: None,
        };
        assert!(short_title.validate().is_err());
    }
}
