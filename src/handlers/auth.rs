// handlers/auth.rs - public account endpoints (registration + token issuance)
use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: String,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if !self.email.contains('@') {
            field_errors.insert("email".to_string(), "must be a valid email address".to_string());
        }
        if self.username.trim().is_empty() {
            field_errors.insert("username".to_string(), "must not be empty".to_string());
        }
        if self.password.chars().count() < 6 {
            field_errors
                .insert("password".to_string(), "must be at least 6 characters".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity("Invalid user payload", field_errors))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/register - create a user account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<StatusCode, ApiError> {
    payload.validate()?;

    let hashed_password = auth::hash_password(&payload.password)?;

    sqlx::query(
        "INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role) \
         VALUES (?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(&payload.email)
    .bind(&payload.username)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&hashed_password)
    .bind(&payload.role)
    .execute(&state.pool)
    .await
    .map_err(|err| match &err {
        // Uniqueness lives in the storage layer; surface it as a conflict.
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("Username or email already registered")
        }
        _ => ApiError::from(err),
    })?;

    Ok(StatusCode::CREATED)
}

/// POST /auth/token - authenticate and receive a bearer token.
///
/// Absent user, wrong password, and inactive account are indistinct on
/// purpose.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Token>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(&payload.username)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active || !auth::verify_password(&payload.password, &user.hashed_password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let claims = Claims::new(&user.username, user.id, &user.role, &state.config.security);
    let access_token = auth::generate_jwt(&claims, &state.config.security)?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
