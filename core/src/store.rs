//! Task persistence seam.
//!
//! # Design
//! `TaskStore` is the only thing the service needs from a backend: point
//! operations keyed by id plus an owner-scoped listing. Each call is atomic
//! on its own; there are no cross-record transactions. Futures are required
//! to be `Send` so services built on any store can run inside axum handlers.
//!
//! `InMemoryTaskStore` keeps records in insertion order, which is the
//! "natural order" unfiltered listings return.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::Task;

/// Failures reported by a `TaskStore` backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} already exists")]
    Duplicate(Uuid),

    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

pub trait TaskStore: Send + Sync {
    /// Store a new record. Fails if a record with the same id exists.
    fn insert(&self, task: Task) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Replace an existing record. Returns `false` if no record has that id.
    fn update(&self, task: Task) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Remove a record. Returns `false` if no record had that id.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Every record owned by `owner`, in insertion order.
    fn list_by_owner(&self, owner: &str) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;
}

/// Insertion-ordered store held in process memory.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    records: Arc<RwLock<Records>>,
}

#[derive(Debug, Default)]
struct Records {
    next_seq: u64,
    rows: BTreeMap<u64, Task>,
    index: HashMap<Uuid, u64>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.index.contains_key(&task.id) {
            return Err(StoreError::Duplicate(task.id));
        }
        let seq = records.next_seq;
        records.next_seq += 1;
        records.index.insert(task.id, seq);
        records.rows.insert(seq, task);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let records = self.records.read().await;
        Ok(records.index.get(&id).and_then(|seq| records.rows.get(seq)).cloned())
    }

    async fn update(&self, task: Task) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let Some(seq) = records.index.get(&task.id).copied() else {
            return Ok(false);
        };
        records.rows.insert(seq, task);
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.index.remove(&id) {
            Some(seq) => {
                records.rows.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .rows
            .values()
            .filter(|task| task.is_owned_by(owner))
            .cloned()
            .collect())
    }
}
