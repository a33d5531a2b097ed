//! Error types for the football statistics application

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl StatsError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        StatsError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        StatsError::NotFound { what: what.into() }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StatsError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StatsError::Storage {
            message: format!("connection lock poisoned: {}", err),
        }
    }
}
