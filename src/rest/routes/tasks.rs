// rest/routes/tasks.rs — Task CRUD routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::rest::error::ApiError;
use crate::storage::TaskRow;
use crate::tasks::{parse_due_date, validate_title, TaskStatus};
use crate::AppContext;

const INVALID_TITLE: &str = "Title must be at least 3 characters";
const INVALID_DUE_DATE: &str = "Invalid due_date format. Use YYYY-MM-DD";
const INVALID_STATUS: &str = "Invalid status. Must be: pending, in-progress, or completed";

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

/// Patch payload. Fields left out — or sent as `""` — keep their stored
/// values, so a field cannot be cleared to empty through this endpoint.
#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

/// Path ids parse as base-10 u32. `0` parses fine and 404s on lookup.
fn parse_task_id(id: &str) -> Result<i64, ApiError> {
    match id.parse::<u32>() {
        Ok(n) => Ok(n as i64),
        Err(_) => Err(ApiError::validation("Invalid task ID")),
    }
}

async fn load_task(ctx: &AppContext, id: i64) -> Result<TaskRow, ApiError> {
    ctx.storage
        .get_task(id)
        .await
        .map_err(|e| ApiError::persistence("Failed to fetch task", e))?
        .ok_or(ApiError::NotFound("Task not found"))
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::validation("Invalid request body"))?;

    let title = input.title.unwrap_or_default();
    if !validate_title(&title) {
        return Err(ApiError::validation(INVALID_TITLE));
    }

    let due_date = input
        .due_date
        .ok_or_else(|| ApiError::validation("due_date is required"))?;
    if parse_due_date(&due_date).is_none() {
        return Err(ApiError::validation(INVALID_DUE_DATE));
    }

    let status = match input.status.as_deref() {
        None | Some("") => TaskStatus::Pending,
        Some(s) => TaskStatus::parse(s).ok_or_else(|| ApiError::validation(INVALID_STATUS))?,
    };

    let description = input.description.unwrap_or_default();

    let task = ctx
        .storage
        .create_task(&title, &description, &due_date, status.as_str())
        .await
        .map_err(|e| ApiError::persistence("Failed to create task", e))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully", "data": task })),
    ))
}

pub async fn list_tasks(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let tasks = ctx
        .storage
        .list_tasks()
        .await
        .map_err(|e| ApiError::persistence("Failed to fetch tasks", e))?;

    Ok(Json(
        json!({ "message": "Tasks retrieved successfully", "data": tasks }),
    ))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = load_task(&ctx, id).await?;

    Ok(Json(
        json!({ "message": "Task retrieved successfully", "data": task }),
    ))
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    let mut task = load_task(&ctx, id).await?;
    let Json(input) = payload.map_err(|_| ApiError::validation("Invalid request body"))?;

    if let Some(title) = input.title.filter(|t| !t.is_empty()) {
        if !validate_title(&title) {
            return Err(ApiError::validation(INVALID_TITLE));
        }
        task.title = title;
    }
    if let Some(description) = input.description.filter(|d| !d.is_empty()) {
        task.description = description;
    }
    if let Some(due_date) = input.due_date.filter(|d| !d.is_empty()) {
        if parse_due_date(&due_date).is_none() {
            return Err(ApiError::validation(INVALID_DUE_DATE));
        }
        task.due_date = due_date;
    }
    if let Some(status) = input.status.filter(|s| !s.is_empty()) {
        if TaskStatus::parse(&status).is_none() {
            return Err(ApiError::validation(INVALID_STATUS));
        }
        task.status = status;
    }

    let task = ctx
        .storage
        .update_task(&task)
        .await
        .map_err(|e| ApiError::persistence("Failed to update task", e))?;

    Ok(Json(
        json!({ "message": "Task updated successfully", "data": task }),
    ))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;

    // No existence check: deleting an id that is already gone still succeeds.
    ctx.storage
        .delete_task(id)
        .await
        .map_err(|e| ApiError::persistence("Failed to delete task", e))?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
