//! In-memory stores for tests and local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult, TaskStore};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, User};

fn poisoned(err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {err}"))
}

/// Thread-safe in-memory user store keyed by username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, user: CreateUser) -> StoreResult<User> {
        // Check and insert under one write lock.
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(created.username.clone(), created.clone());
        Ok(created)
    }
}

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<TaskState>>,
}

#[derive(Debug, Default)]
struct TaskState {
    // Insertion sequence breaks ties between equal `created_at` values.
    tasks: HashMap<Uuid, (u64, Task)>,
    next_seq: u64,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_all_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut owned: Vec<&(u64, Task)> = state
            .tasks
            .values()
            .filter(|(_, task)| task.owner_id == owner_id)
            .collect();
        owned.sort_by_key(|(seq, task)| (task.created_at, *seq));

        Ok(owned.into_iter().map(|(_, task)| task.clone()).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).map(|(_, task)| task.clone()))
    }

    async fn insert(&self, task: CreateTask) -> StoreResult<Task> {
        let mut state = self.state.write().map_err(poisoned)?;

        let now = Utc::now();
        let created = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: TaskStatus::Open,
            owner_id: task.owner_id,
            created_at: now,
            updated_at: now,
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.tasks.insert(created.id, (seq, created.clone()));
        Ok(created)
    }

    async fn update(&self, task: &Task) -> StoreResult<Task> {
        let mut state = self.state.write().map_err(poisoned)?;

        let (_, stored) = state
            .tasks
            .get_mut(&task.id)
            .ok_or(StoreError::TaskNotFound(task.id))?;

        // Owner and creation time are never overwritten.
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.status = task.status;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .tasks
            .remove(&task.id)
            .map(|_| ())
            .ok_or(StoreError::TaskNotFound(task.id))
    }

    async fn ping(&self) -> StoreResult<()> {
        let _state = self.state.read().map_err(poisoned)?;
        Ok(())
    }
}
