use crate::core::{AppError, Result};
use crate::middleware::auth::AccessLevel;
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: String,
    /// Absolute base of the host admin, used to build redirect targets
    pub base_url: String,
    /// Edition locale used when a form leaves `locale` blank
    pub default_locale: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Argon2 PHC string of the admin API key
    pub admin_api_key_hash: String,
    pub admin_access: Vec<AccessLevel>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            base_url: env::var("ADMIN_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en_US".to_string()),
        })
    }
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self> {
        let admin_access = env::var("ADMIN_ACCESS")
            .unwrap_or_else(|_| "view,create,update,delete".to_string());

        Ok(SecurityConfig {
            admin_api_key_hash: env::var("ADMIN_API_KEY_HASH").map_err(|_| {
                AppError::Configuration("ADMIN_API_KEY_HASH not set".to_string())
            })?,
            admin_access: parse_access_levels(&admin_access)?,
        })
    }
}

/// Parse a comma separated list such as `view,update`
pub fn parse_access_levels(raw: &str) -> Result<Vec<AccessLevel>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<AccessLevel>()
                .map_err(|_| AppError::Configuration(format!("Invalid ADMIN_ACCESS level: {}", s)))
        })
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.app.base_url).is_err() {
            return Err(AppError::Configuration(format!(
                "ADMIN_BASE_URL is not an absolute URL: {}",
                self.app.base_url
            )));
        }

        if self.app.default_locale.trim().is_empty() {
            return Err(AppError::Configuration(
                "DEFAULT_LOCALE must not be empty".to_string(),
            ));
        }

        if argon2::PasswordHash::new(&self.security.admin_api_key_hash).is_err() {
            return Err(AppError::Configuration(
                "ADMIN_API_KEY_HASH is not a valid PHC string".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE must not exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }
}
