// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::database;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use tasksync_common::{Task, TaskDraft, TaskId};
use tracing::{debug, error, info};

/// Message returned when a draft arrives without a usable title.
pub const TITLE_REQUIRED: &str = "Title is mandatory";

/// Handler for listing every task.
pub async fn list_tasks(State(pool): State<SqlitePool>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = database::get_all_tasks_from_db(&pool).await?;
    info!("Successfully retrieved {} tasks.", tasks.len());
    Ok(Json(tasks))
}

/// Handler for fetching one task by ID.
pub async fn get_task(
    State(pool): State<SqlitePool>,
    Path(task_id): Path<TaskId>,
) -> Result<Json<Task>, AppError> {
    database::get_task_from_db(&pool, task_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(task_id))
}

/// Handler for creating a new task.
pub async fn create_task(
    State(pool): State<SqlitePool>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    debug!("Received request to create task: {:?}", draft.title);
    validate_draft(&draft)?;

    let new_task = database::create_task_in_db(&pool, draft).await?;

    info!("Task created successfully with ID: {}", new_task.id);

    // Return a 201 Created status with the new task as JSON.
    Ok((StatusCode::CREATED, Json(new_task)))
}

/// Handler for replacing a task's editable fields.
pub async fn update_task(
    State(pool): State<SqlitePool>,
    Path(task_id): Path<TaskId>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, AppError> {
    debug!("Received request to update task with ID: {}", task_id);
    validate_draft(&draft)?;

    let updated = database::update_task_in_db(&pool, task_id, draft)
        .await?
        .ok_or_else(|| AppError::not_found(task_id))?;

    info!("Task with ID {} updated successfully.", task_id);
    Ok(Json(updated))
}

/// Handler for deleting a task by ID.
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    Path(task_id): Path<TaskId>, // Extract task ID from the URL path
) -> Result<StatusCode, AppError> {
    debug!("Attempting to delete task with ID: {}", task_id);

    if database::delete_task_from_db(&pool, task_id).await? {
        info!("Task with ID {} deleted successfully.", task_id);
        Ok(StatusCode::NO_CONTENT) // 204 No Content for successful deletion
    } else {
        Err(AppError::not_found(task_id))
    }
}

fn validate_draft(draft: &TaskDraft) -> Result<(), AppError> {
    if !draft.has_title() {
        error!("Validation failed: title is empty.");
        return Err(AppError::new(StatusCode::BAD_REQUEST, TITLE_REQUIRED));
    }
    Ok(())
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    fn not_found(task_id: TaskId) -> Self {
        error!("Task with ID {} not found.", task_id);
        Self::new(
            StatusCode::NOT_FOUND,
            &format!("Task with ID {task_id} not found."),
        )
    }
}

/// Allows converting an `anyhow::Error` (coming from `database.rs`)
/// into our `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Log the internal error for debugging.
        tracing::error!("Internal server error: {:?}", err);
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred.".to_string(),
        }
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}
