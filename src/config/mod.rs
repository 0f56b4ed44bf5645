use std::env;
use std::str::FromStr;

use thiserror::Error;

pub use jsonwebtoken::Algorithm;

/// Configuration errors that abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("unsupported JWT algorithm: {0}")]
    InvalidAlgorithm(String),
}

/// Process-wide configuration, loaded once at startup and passed explicitly
/// into the router state. Nothing reads the environment after this returns.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    /// Build configuration from the environment. JWT_SECRET_HEX and ALGORITHM
    /// are required; everything else has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let jwt_secret =
            env::var("JWT_SECRET_HEX").map_err(|_| ConfigError::MissingVar("JWT_SECRET_HEX"))?;
        let algorithm_name =
            env::var("ALGORITHM").map_err(|_| ConfigError::MissingVar("ALGORITHM"))?;
        let jwt_algorithm = Algorithm::from_str(&algorithm_name)
            .map_err(|_| ConfigError::InvalidAlgorithm(algorithm_name))?;

        let port = env::var("TODO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8000);

        let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todosapp.db".to_string());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let jwt_expiry_hours = env::var("SECURITY_JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);

        Ok(Self {
            environment,
            server: ServerConfig { port },
            database: DatabaseConfig { url, max_connections },
            security: SecurityConfig { jwt_secret, jwt_algorithm, jwt_expiry_hours },
        })
    }
}
