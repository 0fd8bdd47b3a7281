use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::application::task_service::TaskError;

/// Wire-level error: the status plus the `{"error": ...}` body every
/// failure path responds with.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(e) => Self::validation(e.to_string()),
            TaskError::NotFound => {
                Self { status: StatusCode::NOT_FOUND, message: "Task not found".into() }
            }
            // logged here, masked for the client
            TaskError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "Internal server error".into() }
            }
        }
    }
}
