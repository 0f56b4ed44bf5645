// handlers/todos.rs - /todos/* resource handlers, scoped to the caller
use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::require_user;
use crate::database::models::Todo;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

impl TodoRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if self.title.chars().count() < 3 {
            field_errors.insert("title".to_string(), "must be at least 3 characters".to_string());
        }
        let description_len = self.description.chars().count();
        if !(3..=100).contains(&description_len) {
            field_errors.insert(
                "description".to_string(),
                "must be between 3 and 100 characters".to_string(),
            );
        }
        if !(1..=5).contains(&self.priority) {
            field_errors.insert("priority".to_string(), "must be between 1 and 5".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity("Invalid todo payload", field_errors))
        }
    }
}

/// Partial update: absent fields mean "leave unchanged".
#[derive(Debug, Deserialize)]
pub struct TodoUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub complete: Option<bool>,
}

impl TodoUpdateRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if let Some(title) = &self.title {
            if title.chars().count() < 3 {
                field_errors
                    .insert("title".to_string(), "must be at least 3 characters".to_string());
            }
        }
        if let Some(description) = &self.description {
            if !(3..=100).contains(&description.chars().count()) {
                field_errors.insert(
                    "description".to_string(),
                    "must be between 3 and 100 characters".to_string(),
                );
            }
        }
        if let Some(priority) = self.priority {
            if !(1..=5).contains(&priority) {
                field_errors
                    .insert("priority".to_string(), "must be between 1 and 5".to_string());
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity("Invalid todo payload", field_errors))
        }
    }
}

// The id path parameter is constrained to positive integers.
fn validate_todo_id(todo_id: i64) -> Result<(), ApiError> {
    if todo_id > 0 {
        return Ok(());
    }
    let mut field_errors = HashMap::new();
    field_errors.insert("todo_id".to_string(), "must be greater than 0".to_string());
    Err(ApiError::unprocessable_entity("Invalid path parameter", field_errors))
}

/// GET /todos/ - all todos owned by the caller. No ordering guarantee.
pub async fn read_all(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let user = require_user(user)?;

    let todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE owner_id = ?")
        .bind(user.id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(todos))
}

/// GET /todos/todo/:todo_id - single todo; absent and not-owned are both 404.
pub async fn read_todo(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(todo_id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let user = require_user(user)?;
    validate_todo_id(todo_id)?;

    let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ? AND owner_id = ?")
        .bind(todo_id)
        .bind(user.id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Todo not found"))?;

    Ok(Json(todo))
}

/// POST /todos/todo - create a todo owned by the caller.
pub async fn create_todo(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<TodoRequest>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(user)?;
    payload.validate()?;

    sqlx::query(
        "INSERT INTO todos (title, description, priority, complete, owner_id) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.priority)
    .bind(payload.complete)
    .bind(user.id)
    .execute(&state.pool)
    .await?;

    Ok(StatusCode::CREATED)
}

/// PUT /todos/todo/:todo_id - partial update of the caller's todo.
pub async fn update_todo(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(todo_id): Path<i64>,
    Json(payload): Json<TodoUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(user)?;
    validate_todo_id(todo_id)?;
    payload.validate()?;

    // COALESCE keeps the stored value where the payload field is NULL.
    let result = sqlx::query(
        "UPDATE todos SET \
            title = COALESCE(?, title), \
            description = COALESCE(?, description), \
            priority = COALESCE(?, priority), \
            complete = COALESCE(?, complete) \
         WHERE id = ? AND owner_id = ?",
    )
    .bind(payload.title.as_deref())
    .bind(payload.description.as_deref())
    .bind(payload.priority)
    .bind(payload.complete)
    .bind(todo_id)
    .bind(user.id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Todo not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /todos/todo/:todo_id - remove the caller's todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(todo_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(user)?;
    validate_todo_id(todo_id)?;

    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND owner_id = ?")
        .bind(todo_id)
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Todo not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
