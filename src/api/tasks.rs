use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::extract::AppJson;
use crate::api::response;
use crate::api::router::AppState;
use crate::db::task_repo::{self, NewTask, TaskChanges};
use crate::error::TaskError;
use crate::models::{Priority, TaskListQuery, TaskStatus};

const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    status: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
}

/// Unknown body fields (an attempted `owner`, for one) are dropped on the
/// floor by deserialization; only the allow-listed fields below exist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
    status: Option<String>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, TaskError> {
    let query = TaskListQuery::from_params(
        params.status.as_deref(),
        params.search.as_deref(),
        params.sort_by.as_deref(),
    );
    let conn = state.conn()?;
    let tasks = task_repo::list_tasks(&conn, &user.0, &query)?;
    Ok(Json(response::success_list(&tasks)))
}

pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, TaskError> {
    let conn = state.conn()?;
    let task = task_repo::get_task_for_owner(&conn, &user.0, &id)?;
    Ok(Json(response::success_task(&task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), TaskError> {
    let new = NewTask {
        title: parse_title(body.title.as_deref().unwrap_or_default())?,
        description: body.description,
        due_date: body.due_date.as_deref().map(parse_due_date).transpose()?,
        priority: body
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()?
            .unwrap_or_default(),
        status: body
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or_default(),
    };
    let conn = state.conn()?;
    let task = task_repo::create_task(&conn, &user.0, &new)?;
    Ok((StatusCode::CREATED, Json(response::success_task(&task))))
}

pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateTaskRequest>,
) -> Result<Json<Value>, TaskError> {
    let changes = TaskChanges {
        title: body.title.as_deref().map(parse_title).transpose()?,
        description: body.description,
        due_date: body.due_date.as_deref().map(parse_due_date).transpose()?,
        priority: body.priority.as_deref().map(parse_priority).transpose()?,
        status: body.status.as_deref().map(parse_status).transpose()?,
    };
    let conn = state.conn()?;
    let task = task_repo::update_task(&conn, &user.0, &id, &changes)?;
    Ok(Json(response::success_task(&task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, TaskError> {
    let conn = state.conn()?;
    task_repo::delete_task(&conn, &user.0, &id)?;
    Ok(Json(response::success_message("Task deleted")))
}

fn parse_title(raw: &str) -> Result<String, TaskError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TaskError::validation("title is required"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| TaskError::validation("dueDate must use the YYYY-MM-DD format"))
}

fn parse_priority(raw: &str) -> Result<Priority, TaskError> {
    Priority::from_str(raw)
        .ok_or_else(|| TaskError::validation("priority must be one of low, medium, high"))
}

fn parse_status(raw: &str) -> Result<TaskStatus, TaskError> {
    TaskStatus::from_str(raw)
        .ok_or_else(|| TaskError::validation("status must be one of To Do, In Progress, Done"))
}
