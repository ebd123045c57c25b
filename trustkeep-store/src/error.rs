//! Error types for the trust store.

use thiserror::Error;

/// Result type for trust store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in trust store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller supplied empty or malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// No license record exists.
    #[error("no license record found")]
    NotFound,

    /// A write reported success but touched zero rows.
    #[error("no rows were written")]
    NothingWritten,

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error (creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("store connection lock poisoned")]
    Poisoned,
}
