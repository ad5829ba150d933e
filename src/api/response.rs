use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::{ErrorCode, TaskError};
use crate::models::Task;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn success_task(task: &Task) -> Value {
    json!({
        "success": true,
        "data": task
    })
}

pub fn success_list(tasks: &[Task]) -> Value {
    json!({
        "success": true,
        "count": tasks.len(),
        "data": tasks
    })
}

pub fn success_message(message: &str) -> Value {
    json!({
        "success": true,
        "message": message
    })
}

pub fn error_body(err: &TaskError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        // Store failures are logged for the operator; the client only ever
        // sees a generic message.
        if self.code == ErrorCode::DatabaseError {
            tracing::error!(error = %self.message, "task store failure");
            let safe = TaskError::database("Server error");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&safe))).into_response();
        }
        (status_for(self.code), Json(error_body(&self))).into_response()
    }
}
