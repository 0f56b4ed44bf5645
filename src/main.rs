use std::sync::Arc;

use anyhow::Context;

use todo_api_rust::{app, config::AppConfig, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET_HEX, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Fail fast: missing JWT settings must stop the process here, not per-request.
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("starting Todo API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .context("database setup failed")?;

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState { pool, config: Arc::new(config) };

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;

    Ok(())
}
