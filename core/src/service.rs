//! Owner-scoped task operations.
//!
//! # Design
//! Every id-based operation goes through `find_owned`, which fails with
//! `TaskError::NotFound` both when the id is unknown and when the task
//! belongs to another user. Listings only ever read the caller's own rows.

use tracing::debug;
use uuid::Uuid;

use crate::error::TaskError;
use crate::query::TaskQuery;
use crate::store::TaskStore;
use crate::types::{Task, TaskInput};

/// Task access service over any `TaskStore`.
#[derive(Debug, Clone)]
pub struct TaskService<S> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store, for callers that need to seed or inspect records.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a `Pending` task owned by `owner`. Input is stored as given.
    pub async fn create(&self, input: TaskInput, owner: &str) -> Result<Task, TaskError> {
        let task = Task::new(input, owner);
        self.store.insert(task.clone()).await?;
        debug!(task_id = %task.id, owner, "task created");
        Ok(task)
    }

    /// Every task owned by `owner`, unfiltered, in store order.
    pub async fn list_all(&self, owner: &str) -> Result<Vec<Task>, TaskError> {
        Ok(self.store.list_by_owner(owner).await?)
    }

    /// Tasks owned by `owner` that pass `query`, ordered as it requests.
    pub async fn list(&self, owner: &str, query: &TaskQuery) -> Result<Vec<Task>, TaskError> {
        let tasks = self.list_all(owner).await?;
        Ok(query.apply(tasks))
    }

    pub async fn get(&self, id: Uuid, owner: &str) -> Result<Task, TaskError> {
        self.find_owned(id, owner).await
    }

    /// Overwrite title, description and due date. Status and owner are kept.
    pub async fn update(&self, id: Uuid, input: TaskInput, owner: &str) -> Result<Task, TaskError> {
        let mut task = self.find_owned(id, owner).await?;
        task.apply(input);
        // The row can disappear between the lookup and the write.
        if !self.store.update(task.clone()).await? {
            return Err(TaskError::NotFound(id));
        }
        debug!(task_id = %id, owner, "task updated");
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid, owner: &str) -> Result<(), TaskError> {
        self.find_owned(id, owner).await?;
        if !self.store.delete(id).await? {
            return Err(TaskError::NotFound(id));
        }
        debug!(task_id = %id, owner, "task deleted");
        Ok(())
    }

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Task, TaskError> {
        match self.store.get(id).await? {
            Some(task) if task.is_owned_by(owner) => Ok(task),
            _ => Err(TaskError::NotFound(id)),
        }
    }
}
