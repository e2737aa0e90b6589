/// Task model and database operations
///
/// A task is a personal to-do item owned by exactly one user.
///
/// # Status
///
/// ```text
/// OPEN → IN_PROGRESS → DONE
/// ```
///
/// The arrow shows the usual progression only. Any status may be set to any
/// other; see [`TaskStatus::can_transition_to`].
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('OPEN', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL CHECK (char_length(title) > 0),
///     description TEXT NOT NULL CHECK (char_length(description) > 0),
///     status task_status NOT NULL DEFAULT 'OPEN',
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskkeep_shared::models::task::{Task, CreateTask, TaskStatus};
/// use taskkeep_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let mut task = Task::create(&pool, CreateTask {
///     title: "Buy milk".to_string(),
///     description: "2%".to_string(),
///     owner_id,
/// }).await?;
/// assert_eq!(task.status, TaskStatus::Open);
///
/// task.status = TaskStatus::Done;
/// Task::update(&pool, &task).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum title length, in characters
pub const MAX_TITLE_LENGTH: u64 = 100;

/// Task progress status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started (initial status)
    #[default]
    Open,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses, in their usual order of progression
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Checks if a status change is allowed
    ///
    /// Transitions are unrestricted: a task may move from any status to any
    /// other, including back to `OPEN`.
    pub fn can_transition_to(&self, _target: TaskStatus) -> bool {
        true
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status '{0}', expected one of OPEN, IN_PROGRESS, DONE")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    /// Parses the exact wire form (`OPEN`, `IN_PROGRESS`, `DONE`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseTaskStatusError(s.to_string()))
    }
}

/// Task model representing a personal to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title (1..=100 characters)
    pub title: String,

    /// Free-form details (non-empty)
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// User who owns the task; never changes
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// There is no status field: new tasks always start `OPEN`.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Owning user
    pub owner_id: Uuid,
}

impl Task {
    /// Creates a new task in `OPEN` status
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(TaskStatus::Open)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// Not scoped to an owner. Callers check ownership themselves so that
    /// "missing" and "not yours" stay distinguishable.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task owned by `owner_id`, oldest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, owner_id, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Persists the mutable fields of `task` and bumps `updated_at`
    ///
    /// `owner_id` is never written. Returns `None` if the row no longer exists.
    pub async fn update(pool: &PgPool, task: &Task) -> Result<Option<Self>, sqlx::Error> {
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Deletes a task
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
