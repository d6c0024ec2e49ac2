//! Core of the multi-tenant task list.
//!
//! # Overview
//! Holds everything that does not depend on HTTP: the task record, the
//! filter/sort query pipeline, the storage seam with an in-memory backend,
//! the owner-scoped access service and bearer token issuance.
//!
//! # Design
//! - `TaskService` is generic over `TaskStore`; an owner id is passed to
//!   every call and no record is visible across owners.
//! - Unknown ids and foreign ids produce the same `TaskError::NotFound`.
//! - `TokenIssuer` only signs. Verification belongs to the transport layer,
//!   which shares the same `JwtSettings`.

pub mod auth;
pub mod error;
pub mod query;
pub mod service;
pub mod store;
pub mod types;

pub use auth::{AuthError, Claims, JwtSettings, TokenIssuer, DEFAULT_TOKEN_TTL_HOURS};
pub use error::TaskError;
pub use query::{SortKey, TaskQuery};
pub use service::TaskService;
pub use store::{InMemoryTaskStore, StoreError, TaskStore};
pub use types::{Task, TaskInput, DEFAULT_STATUS};
