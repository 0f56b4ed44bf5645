use serde::Serialize;
use sqlx::FromRow;

/// Row in the `todos` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
    pub owner_id: i64,
}
