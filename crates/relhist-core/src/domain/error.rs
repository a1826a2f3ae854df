//! Domain-level error taxonomy for relhist.

/// Relhist domain errors.
#[derive(Debug, thiserror::Error)]
pub enum RelhistError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown filter tag: {0}")]
    UnknownFilterTag(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for relhist domain operations.
pub type Result<T> = std::result::Result<T, RelhistError>;
