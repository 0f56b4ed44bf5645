use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use config::AppConfig;

/// Shared router state: the connection pool and the startup-loaded config.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected resources
        .merge(todo_routes(&state))
        .merge(user_routes(&state))
        .nest("/admin", handlers::admin::router(&state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::login))
}

fn todo_routes(state: &AppState) -> Router<AppState> {
    use handlers::todos;

    Router::new()
        .route("/todos/", get(todos::read_all))
        .route("/todos/todo", post(todos::create_todo))
        .route(
            "/todos/todo/:todo_id",
            get(todos::read_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth_middleware,
        ))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/user/", get(users::get_user))
        .route("/user/change_password", put(users::change_password))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth_middleware,
        ))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-user to-do list API with JWT authentication",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/token (public - account + token acquisition)",
                "todos": "/todos/, /todos/todo[/:id] (protected)",
                "user": "/user/, /user/change_password (protected)",
                "admin": "/admin/* (protected, reserved)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
