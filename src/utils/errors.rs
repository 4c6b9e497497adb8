//! Error handling for PromoFlow
//!
//! This module defines the main error type used throughout the workflow core
//! and the mapping from internal errors onto the four caller-facing kinds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PromoFlow
#[derive(Error, Debug)]
pub enum PromoFlowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("Invalid status transition")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    Forbidden(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PromoFlow operations
pub type Result<T> = std::result::Result<T, PromoFlowError>;

/// Caller-facing error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    ValidationError,
    Forbidden,
    InternalError,
}

impl ErrorKind {
    /// HTTP status code a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::ValidationError => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::InternalError => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::ValidationError => write!(f, "ValidationError"),
            ErrorKind::Forbidden => write!(f, "Forbidden"),
            ErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured error body returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PromoFlowError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        PromoFlowError::NotFound { entity, id }
    }

    /// Map onto the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromoFlowError::NotFound { .. } => ErrorKind::NotFound,
            PromoFlowError::Validation(_) | PromoFlowError::InvalidTransition { .. } => {
                ErrorKind::ValidationError
            }
            PromoFlowError::Forbidden(_) => ErrorKind::Forbidden,
            _ => ErrorKind::InternalError,
        }
    }

    /// Build the wire body. Internal causes are logged, never echoed.
    pub fn to_api_error(&self) -> ApiError {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::InternalError => {
                tracing::error!(error = %self, "Internal error surfaced to caller");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        ApiError { kind, message }
    }
}
