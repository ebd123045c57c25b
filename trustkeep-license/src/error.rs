//! Error types for the licensing module.

use thiserror::Error;
use trustkeep_store::StoreError;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Caller supplied empty or malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// No license has been configured on this installation.
    #[error("license not configured")]
    NotConfigured,

    /// Trust store failure. The trust state should be treated as unknown.
    #[error("storage error: {0}")]
    Store(StoreError),

    /// The authority could not be reached or its response was unreadable.
    #[error("network error: {0}")]
    Network(String),

    /// The authority rejected a token during setup.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The authority rejected the configured license during a check.
    #[error("invalid license: {0}")]
    InvalidLicense(String),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for LicenseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::NotFound => Self::NotConfigured,
            other => Self::Store(other),
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
