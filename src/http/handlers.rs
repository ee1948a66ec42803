//! Request handlers.
//!
//! Each handler loads the whole task list through the store, applies one
//! operation from [`crate::task`], and (for mutations) writes the whole list
//! back. Store I/O is blocking and runs on the blocking thread pool.
//!
//! Mutations answer `{"success": true}` whether or not the id existed. Under
//! the `log` error policy storage failures are only logged, so the answer is
//! the same then too; under `fail` they become a 500.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::Error;
use crate::store::TaskStore;
use crate::task::{self, NewTask, Task, TaskCounts, TaskFilter};

// =============================================================================
// Responses
// =============================================================================

/// Storage failure surfaced to the client.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Success {
    pub success: bool,
}

const OK: Success = Success { success: true };

/// Everything the list page renders.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexView {
    pub tasks: Vec<Task>,
    pub categories: Vec<String>,
    pub counts: TaskCounts,
    pub now: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Request payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    pub task_content: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityForm {
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub category: String,
}

// =============================================================================
// Store access
// =============================================================================

async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&TaskStore) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|err| Error::OperationFailed(format!("store task panicked: {err}")))?;
    Ok(result?)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Json<IndexView>, ApiError> {
    let tasks = with_store(&state, |store| store.snapshot()).await?;
    Ok(Json(IndexView {
        categories: task::distinct_categories(&tasks),
        counts: TaskCounts::of(&tasks),
        now: task::timestamp_now(),
        tasks,
    }))
}

/// POST /add_task
///
/// Empty or missing `task_content` leaves the store untouched.
pub async fn add_task(
    State(state): State<AppState>,
    Form(form): Form<AddTaskForm>,
) -> Result<Redirect, ApiError> {
    let content = form.task_content.unwrap_or_default();
    if content.is_empty() {
        tracing::debug!("ignoring add_task without content");
        return Ok(Redirect::to("/"));
    }

    let new_task = NewTask::new(content)
        .with_priority(
            form.priority
                .unwrap_or_else(|| state.defaults.default_priority.clone()),
        )
        .with_category(
            form.category
                .unwrap_or_else(|| state.defaults.default_category.clone()),
        );

    let id = with_store(&state, move |store| {
        store.update(|tasks| task::create(tasks, new_task))
    })
    .await?;
    match id {
        Some(id) => tracing::info!(id, "created task"),
        None => tracing::warn!("no task id left to assign"),
    }

    Ok(Redirect::to("/"))
}

/// POST /toggle_task/:id
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Success>, ApiError> {
    let completed = with_store(&state, move |store| {
        store.update(|tasks| task::toggle(tasks, id))
    })
    .await?;
    tracing::debug!(id, completed = ?completed, "toggled task");
    Ok(Json(OK))
}

/// POST /delete_task/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Success>, ApiError> {
    let removed = with_store(&state, move |store| {
        store.update(|tasks| task::delete(tasks, id))
    })
    .await?;
    tracing::debug!(id, removed, "deleted task");
    Ok(Json(OK))
}

/// GET /api/tasks?filter=all|active|completed&category=all|<name>
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = TaskFilter::from_params(query.filter.as_deref(), query.category.as_deref());
    let tasks = with_store(&state, |store| store.snapshot()).await?;
    let selected = task::filter(&tasks, &filter).into_iter().cloned().collect();
    Ok(Json(selected))
}

/// POST /update_task_priority/:id
pub async fn update_task_priority(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<PriorityForm>,
) -> Result<Json<Success>, ApiError> {
    let found = with_store(&state, move |store| {
        store.update(|tasks| task::set_priority(tasks, id, &form.priority))
    })
    .await?;
    tracing::debug!(id, found, "updated task priority");
    Ok(Json(OK))
}

/// POST /update_task_category/:id
pub async fn update_task_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Result<Json<Success>, ApiError> {
    let found = with_store(&state, move |store| {
        store.update(|tasks| task::set_category(tasks, id, &form.category))
    })
    .await?;
    tracing::debug!(id, found, "updated task category");
    Ok(Json(OK))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let tasks = with_store(&state, |store| store.snapshot()).await?;
    Ok(Json(task::distinct_categories(&tasks)))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
