//! Common error types for the club site

use thiserror::Error;

use crate::validation::FieldError;

/// Common result type for club site operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the club site crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (rendered sqlx::Error)
    #[error("Database error: {0}")]
    Database(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more request fields failed validation
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Unique constraint would be violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Conflict(db.message().to_string())
            }
            other => Error::Database(other.to_string()),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
