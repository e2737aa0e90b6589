//! PostgreSQL stores built on the model queries.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult, TaskStore};
use crate::db::pool::health_check;
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User, USERNAME_UNIQUE_CONSTRAINT};

/// Returns true when `err` is a violation of the username UNIQUE constraint.
fn is_duplicate_username(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                && db_err
                    .constraint()
                    .map_or(true, |name| name == USERNAME_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

/// User store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Creates a store that runs queries on `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn create(&self, user: CreateUser) -> StoreResult<User> {
        // Early exit only; the UNIQUE constraint decides races.
        if User::find_by_username(&self.pool, &user.username)
            .await?
            .is_some()
        {
            return Err(StoreError::DuplicateUsername);
        }

        match User::create(&self.pool, user).await {
            Ok(created) => Ok(created),
            Err(err) if is_duplicate_username(&err) => {
                debug!("Concurrent registration lost the username race");
                Err(StoreError::DuplicateUsername)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Task store backed by the `tasks` table.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Creates a store that runs queries on `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_all_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, task: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, task).await?)
    }

    async fn update(&self, task: &Task) -> StoreResult<Task> {
        Task::update(&self.pool, task)
            .await?
            .ok_or(StoreError::TaskNotFound(task.id))
    }

    async fn delete(&self, task: &Task) -> StoreResult<()> {
        if Task::delete(&self.pool, task.id).await? {
            Ok(())
        } else {
            Err(StoreError::TaskNotFound(task.id))
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(|err| {
            warn!(error = %err, "Task store ping failed");
            StoreError::Database(err)
        })
    }
}
