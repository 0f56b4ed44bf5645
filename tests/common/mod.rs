#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use todo_api_rust::config::{
    Algorithm, AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig,
};
use todo_api_rust::{app, database, AppState};

/// Router over a fresh in-memory database. One connection so every request
/// sees the same SQLite instance.
pub async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    database::MIGRATOR.run(&pool).await.expect("migrations");

    let config = AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        security: SecurityConfig {
            jwt_secret: "integration-test-secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiry_hours: 1,
        },
    };

    app(AppState { pool, config: Arc::new(config) })
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_json_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn register_user(app: &Router, username: &str, email: &str, password: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            &json!({
                "email": email,
                "username": username,
                "first_name": "Test",
                "last_name": "User",
                "password": password,
                "role": "user",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/token",
            &json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}

/// Register a user with a default password and return a bearer token.
pub async fn signup(app: &Router, username: &str) -> String {
    let email = format!("{}@example.com", username);
    register_user(app, username, &email, "password123").await;
    login(app, username, "password123").await
}

/// Create a todo and return its id, taken from the caller's list.
pub async fn create_todo(app: &Router, token: &str, body: &Value) -> i64 {
    let response = app
        .clone()
        .oneshot(authed_json_request("POST", "/todos/todo", token, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/todos/", token))
        .await
        .unwrap();
    let todos = body_json(response).await;
    todos
        .as_array()
        .expect("todo list")
        .iter()
        .filter_map(|t| t["id"].as_i64())
        .max()
        .expect("created todo id")
}
