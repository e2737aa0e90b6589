//! Owner-scoped task operations.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_ownership;
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskStatus, MAX_TITLE_LENGTH};
use crate::store::TaskStore;
use crate::validation::validate_input;

/// Fields a caller supplies when creating a task.
#[derive(Debug, Clone, Validate)]
pub struct NewTask {
    #[validate(length(
        min = 1,
        max = MAX_TITLE_LENGTH,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Task workflow. Every operation is scoped to the calling user.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Lists the caller's tasks, oldest first.
    pub async fn list(&self, caller: &AuthContext) -> ServiceResult<Vec<Task>> {
        let tasks = self.tasks.find_all_by_owner(caller.user_id).await?;
        debug!(user_id = %caller.user_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Fetches one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no task has this ID
    /// - `Forbidden` if the task belongs to another user
    pub async fn get(&self, id: Uuid, caller: &AuthContext) -> ServiceResult<Task> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        if let Err(denied) = require_ownership(caller, task.owner_id) {
            warn!(user_id = %caller.user_id, task_id = %id, "Task access denied");
            return Err(denied.into());
        }

        debug!(user_id = %caller.user_id, task_id = %id, "Fetched task");
        Ok(task)
    }

    /// Creates an `OPEN` task owned by the caller.
    pub async fn create(&self, input: NewTask, caller: &AuthContext) -> ServiceResult<Task> {
        validate_input(&input)?;

        let task = self
            .tasks
            .insert(CreateTask {
                title: input.title,
                description: input.description,
                owner_id: caller.user_id,
            })
            .await?;

        info!(user_id = %caller.user_id, task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Sets the status of one of the caller's tasks.
    ///
    /// Any status may follow any other.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        caller: &AuthContext,
    ) -> ServiceResult<Task> {
        let mut task = self.get(id, caller).await?;

        if !task.status.can_transition_to(status) {
            return Err(ServiceError::invalid(
                "status",
                format!("cannot move from {} to {}", task.status, status),
            ));
        }

        let from = task.status;
        task.status = status;
        let task = self.tasks.update(&task).await?;

        info!(
            user_id = %caller.user_id,
            task_id = %id,
            from = %from,
            to = %status,
            "Task status updated"
        );
        Ok(task)
    }

    /// Deletes one of the caller's tasks.
    pub async fn delete(&self, id: Uuid, caller: &AuthContext) -> ServiceResult<()> {
        let task = self.get(id, caller).await?;
        self.tasks.delete(&task).await?;

        info!(user_id = %caller.user_id, task_id = %id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTaskStore;

    fn caller() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), "alice")
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let service = TaskService::new(Arc::new(InMemoryTaskStore::new()));
        let alice = caller();

        let cases = [
            NewTask::new("", "desc"),
            NewTask::new("x".repeat(MAX_TITLE_LENGTH as usize + 1), "desc"),
            NewTask::new("title", ""),
        ];
        for input in cases {
            assert!(matches!(
                service.create(input, &alice).await,
                Err(ServiceError::Validation(_))
            ));
        }

        assert!(service.list(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_title_length_counts_characters() {
        let service = TaskService::new(Arc::new(InMemoryTaskStore::new()));

        // 100 characters, 300 bytes
        let title = "界".repeat(MAX_TITLE_LENGTH as usize);
        let task = service
            .create(NewTask::new(title, "desc"), &caller())
            .await
            .unwrap();
        assert_eq!(task.title.chars().count() as u64, MAX_TITLE_LENGTH);
    }
}
