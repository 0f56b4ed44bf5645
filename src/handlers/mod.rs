// Request handlers, one module per resource router.

pub mod admin;
pub mod auth;
pub mod todos;
pub mod users;

use axum::Extension;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// The auth middleware injects the identity before any protected handler
/// runs; handlers still re-check for a missing one.
pub(crate) fn require_user(user: Option<Extension<AuthUser>>) -> Result<AuthUser, ApiError> {
    user.map(|Extension(user)| user)
        .ok_or_else(|| ApiError::unauthorized("Authentication failed"))
}
