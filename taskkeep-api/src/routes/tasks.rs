/// Task endpoints
///
/// All routes require a bearer token and only ever touch the caller's own
/// tasks. A task owned by someone else answers 403; an id that names no task
/// (including one that is not a UUID) answers 404.
///
/// # Endpoints
///
/// - `GET    /tasks`            - List the caller's tasks
/// - `POST   /tasks`            - Create a task
/// - `GET    /tasks/:id`        - Fetch one task
/// - `PATCH  /tasks/:id/status` - Change a task's status
/// - `DELETE /tasks/:id`        - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response::Envelope,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde::Deserialize;
use taskkeep_shared::{
    auth::middleware::AuthContext,
    error::ServiceError,
    models::task::{Task, TaskStatus},
    services::NewTask,
};
use uuid::Uuid;

/// Create task request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

/// Update status request
///
/// `status` is one of `OPEN`, `IN_PROGRESS`, `DONE`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

/// List handler
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> ApiResult<Envelope<Vec<Task>>> {
    let tasks = state.tasks.list(&caller).await?;
    Ok(Envelope::ok(tasks))
}

/// Get handler
pub async fn get_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Task>> {
    let id = parse_task_id(&id)?;
    let task = state.tasks.get(id, &caller).await?;
    Ok(Envelope::ok(task))
}

/// Create handler
///
/// New tasks always start `OPEN` and belong to the caller.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<Envelope<Task>> {
    let task = state
        .tasks
        .create(NewTask::new(req.title, req.description), &caller)
        .await?;
    Ok(Envelope::created(task))
}

/// Update status handler
///
/// The body is checked before the path: an unknown status is a 422 even when
/// the id names no task.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> ApiResult<Envelope<Task>> {
    let status = req
        .status
        .parse::<TaskStatus>()
        .map_err(ServiceError::from)?;
    let id = parse_task_id(&id)?;

    let task = state.tasks.update_status(id, status, &caller).await?;
    Ok(Envelope::ok(task))
}

/// Delete handler
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_task_id(&id)?;
    state.tasks.delete(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
