use serde::Serialize;
use sqlx::FromRow;

/// Row in the `users` table. The hash never serializes into a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub role: String,
}
