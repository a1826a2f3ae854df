//! Error types for relhist-state

use thiserror::Error;

/// Errors that can occur at the release backend boundary
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend has no releases recorded for this application
    #[error("application not found: {app_name}")]
    AppNotFound { app_name: String },

    /// Backend request failed
    #[error("release backend request failed: {0}")]
    Backend(String),

    /// Reading a release file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Release payload could not be decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The backend stopped publishing and refuses new watches
    #[error("subscription closed")]
    SubscriptionClosed,
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
