//! Persistence ports for users and tasks.
//!
//! The workflows only ever see the [`CredentialStore`] and [`TaskStore`]
//! traits. Two adapters implement them: [`postgres`] for the running service
//! and [`memory`] for tests and local experiments.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCredentialStore, InMemoryTaskStore};
pub use postgres::{PgCredentialStore, PgTaskStore};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The username is already registered.
    #[error("username already exists")]
    DuplicateUsername,

    /// The task row does not exist (or no longer exists).
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store cannot be used at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// User persistence contract.
///
/// Users are never updated or deleted, so there are no operations for it.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateUsername`] when the username is taken,
    /// including when a concurrent insert wins the race.
    async fn create(&self, user: CreateUser) -> StoreResult<User>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every task owned by `owner_id`, oldest first.
    async fn find_all_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Finds a task by ID regardless of owner.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Stores a new task with status `OPEN`.
    async fn insert(&self, task: CreateTask) -> StoreResult<Task>;

    /// Persists the status of an existing task and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the row has vanished.
    async fn update(&self, task: &Task) -> StoreResult<Task>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the row has vanished.
    async fn delete(&self, task: &Task) -> StoreResult<()>;

    /// Checks that the store can serve requests.
    async fn ping(&self) -> StoreResult<()>;
}

/// The pair of stores a running service needs.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            credentials: Arc::new(PgCredentialStore::new(pool.clone())),
            tasks: Arc::new(PgTaskStore::new(pool)),
        }
    }

    /// Empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            credentials: Arc::new(InMemoryCredentialStore::new()),
            tasks: Arc::new(InMemoryTaskStore::new()),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
