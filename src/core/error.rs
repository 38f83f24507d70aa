use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Submitted fields failed a type or business rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation errors (constraint violation, connectivity)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Owner entity or tab does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid admin credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the granted access level is insufficient
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn unexpected(msg: impl std::fmt::Display) -> Self {
        AppError::Unexpected(anyhow::anyhow!("{}", msg))
    }

    /// Message shown to the administrator when an operation is re-rendered
    /// with an error attached.
    pub fn display_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Please check your input: {}", msg),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(err) => err.to_string(),
            AppError::Unexpected(err) => {
                format!("Sorry, an error occurred: {} ({:#})", err, err)
            }
            other => format!("Sorry, an error occurred: {}", other),
        }
    }
}
