// handlers/admin.rs - admin extension point
//
// No admin operations are defined. The router exists so future admin
// endpoints mount behind the same JWT wiring as the other resources.

use axum::Router;

use crate::middleware::jwt_auth_middleware;
use crate::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        jwt_auth_middleware,
    ))
}
