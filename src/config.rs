//! Process configuration, read from the environment once at startup.
//!
//! Every component that needs the store handle or the signing secret gets it
//! through [`crate::state::AppState`]; nothing re-reads the environment at
//! call time.

use crate::error::AppError;
use jsonwebtoken::Algorithm;

/// Development-only signing secret. Must be overridden in production.
pub const DEV_SECRET: &str = "change-me-in-production";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/camera_catalog";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_TEMPLATE_DIR: &str = "static/templates";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    pub template_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET.to_string());
        if secret_key == DEV_SECRET {
            tracing::warn!("SECRET_KEY not set; using the insecure development secret");
        }
        let algorithm = std::env::var("ALGORITHM")
            .unwrap_or_else(|_| "HS256".to_string())
            .parse::<Algorithm>()
            .map_err(|_| AppError::Internal("ALGORITHM is not a recognized JWT algorithm".into()))?;
        let token_ttl_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::Internal("ACCESS_TOKEN_EXPIRE_MINUTES must be an integer".into()))?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };
        Ok(AppConfig {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            secret_key,
            algorithm,
            token_ttl_minutes,
            template_dir: std::env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| DEFAULT_TEMPLATE_DIR.to_string()),
        })
    }
}
