use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::application::task_service::TaskService;
use crate::domain::filter::TaskFilter;
use crate::domain::task::{CreateTask, PatchTask, ReplaceTask, Task, TaskId};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> {
    pub service: S,
}

pub fn router<S: TaskService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route(
            "/tasks/:id",
            get(get_task::<S>)
                .put(replace_task::<S>)
                .patch(patch_task::<S>)
                .delete(delete_task::<S>),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    completed: Option<bool>,
    q: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl From<ListQuery> for TaskFilter {
    fn from(query: ListQuery) -> Self {
        let defaults = TaskFilter::default();
        TaskFilter {
            completed: query.completed,
            q: query.q,
            limit: query.limit.unwrap_or(defaults.limit),
            offset: query.offset.unwrap_or(defaults.offset),
        }
    }
}

async fn list_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;
    let tasks = state.service.list(query.into()).await?;
    Ok(Json(tasks))
}

async fn get_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

async fn create_task<S: TaskService>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = body.map_err(bad_body)?;
    let task = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn replace_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<ReplaceTask>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(bad_body)?;
    Ok(Json(state.service.replace(id, body).await?))
}

async fn patch_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<PatchTask>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(bad_body)?;
    Ok(Json(state.service.patch(id, body).await?))
}

async fn delete_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Only the canonical 36-char hyphenated form; the simple, braced, and
// urn encodings uuid otherwise accepts are rejected like any other
// malformed id.
fn parse_id(s: &str) -> Result<TaskId, ApiError> {
    if s.len() != 36 {
        return Err(ApiError::validation("Invalid id"));
    }
    uuid::Uuid::parse_str(s)
        .map(TaskId)
        .map_err(|_| ApiError::validation("Invalid id"))
}

// Malformed bodies are client errors, not 422s.
fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::validation(rejection.body_text())
}
