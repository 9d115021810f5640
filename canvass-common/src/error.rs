//! Common error types for Canvass

use thiserror::Error;

/// Common result type for Canvass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Canvass crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Duplicate submission for a (survey, phone) key
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Export requested for a survey with no responses
    #[error("Empty report: {0}")]
    EmptyReport(String),

    /// External channel call failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// External channel call exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error is the duplicate-submission outcome
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}
