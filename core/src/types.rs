//! Domain records for the task list.
//!
//! # Design
//! `Task` is both the stored record and the wire shape returned to clients,
//! so field names serialize in camelCase. `TaskInput` carries only the fields
//! a caller may set; anything else in the payload (`status`, `userId`, `id`)
//! is dropped during deserialization and can never reach a stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status assigned to every newly created task.
pub const DEFAULT_STATUS: &str = "Pending";

/// A single task owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub user_id: String,
}

impl Task {
    /// Build a fresh `Pending` task owned by `owner`.
    pub fn new(input: TaskInput, owner: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: DEFAULT_STATUS.to_string(),
            user_id: owner.to_string(),
        }
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.user_id == owner
    }

    /// Overwrite the caller-editable fields. Status and owner are untouched.
    pub fn apply(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        self.due_date = input.due_date;
    }
}

/// Payload for creating or updating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: Uuid::nil(),
            title: "Test".to_string(),
            description: "Desc".to_string(),
            due_date: "2030-01-01T00:00:00Z".parse().unwrap(),
            status: DEFAULT_STATUS.to_string(),
            user_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["dueDate"], "2030-01-01T00:00:00Z");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn new_task_is_pending_and_owned() {
        let input: TaskInput =
            serde_json::from_str(r#"{"title":"Write","description":"d","dueDate":"2030-01-01T00:00:00Z"}"#)
                .unwrap();
        let task = Task::new(input, "owner-1");
        assert_eq!(task.status, DEFAULT_STATUS);
        assert!(task.is_owned_by("owner-1"));
        assert!(!task.is_owned_by("owner-2"));
    }

    #[test]
    fn input_ignores_status_and_owner_fields() {
        let input: TaskInput = serde_json::from_str(
            r#"{"title":"T","dueDate":"2030-01-01T00:00:00Z","status":"Completed","userId":"evil"}"#,
        )
        .unwrap();
        let mut task = Task::new(input.clone(), "owner-1");
        task.apply(input);
        assert_eq!(task.status, DEFAULT_STATUS);
        assert_eq!(task.user_id, "owner-1");
    }

    #[test]
    fn input_description_defaults_to_empty() {
        let input: TaskInput =
            serde_json::from_str(r#"{"title":"T","dueDate":"2030-01-01T00:00:00Z"}"#).unwrap();
        assert!(input.description.is_empty());
    }

    #[test]
    fn input_rejects_missing_title() {
        let result: Result<TaskInput, _> = serde_json::from_str(r#"{"dueDate":"2030-01-01T00:00:00Z"}"#);
        assert!(result.is_err());
    }
}
