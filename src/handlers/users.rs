// handlers/users.rs - /user/* handlers for the authenticated caller
use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use super::require_user;
use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Profile body. The password hash is not part of this shape at all.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl ChangePasswordRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        for (field, value) in [
            ("old_password", &self.old_password),
            ("new_password", &self.new_password),
            ("new_password_confirm", &self.new_password_confirm),
        ] {
            if value.chars().count() < 6 {
                field_errors
                    .insert(field.to_string(), "must be at least 6 characters".to_string());
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity("Invalid password payload", field_errors))
        }
    }
}

async fn fetch_caller(state: &AppState, user: &AuthUser) -> Result<User, ApiError> {
    // The account may have been removed after the token was issued.
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /user/ - profile of the authenticated caller.
pub async fn get_user(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(user)?;
    let current_user = fetch_caller(&state, &user).await?;

    Ok(Json(UserResponse {
        username: current_user.username,
        email: current_user.email,
        first_name: current_user.first_name,
        last_name: current_user.last_name,
        role: current_user.role,
    }))
}

/// PUT /user/change_password - replace the caller's password hash.
///
/// Check order: caller record (404) -> old password (401) -> confirmation
/// match (400) -> rehash and persist.
pub async fn change_password(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(user)?;
    payload.validate()?;

    let user_model = fetch_caller(&state, &user).await?;

    if !auth::verify_password(&payload.old_password, &user_model.hashed_password)? {
        return Err(ApiError::unauthorized("Wrong password"));
    }

    if payload.new_password != payload.new_password_confirm {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    let new_hash = auth::hash_password(&payload.new_password)?;
    sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
        .bind(&new_hash)
        .bind(user_model.id)
        .execute(&state.pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
