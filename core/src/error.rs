//! Error types for task operations.
//!
//! # Design
//! `NotFound` covers both a missing id and a task owned by someone else.
//! Callers cannot tell the two apart, so ids belonging to other users cannot
//! be discovered by guessing. Backend failures pass through untouched in `Store`.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Errors returned by `TaskService` operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// No task with this id is visible to the caller.
    #[error("task {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
