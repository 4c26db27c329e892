//! Error types for `todo_tracker`.

use crate::todos::models::ValidationError;

/// Errors that can occur in the todo tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `SQLite` database error occurred.
    ///
    /// This is the one error class that may be fatal for an operation: the
    /// store cannot guarantee the write was persisted, so callers must not
    /// swallow it.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record failed schema validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A todo addressed by id or task name does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
