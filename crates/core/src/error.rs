//! Error types for shelfwise.

use thiserror::Error;

/// Result type for shelfwise operations.
pub type ShelfResult<T> = Result<T, ShelfError>;

/// Errors that can occur in shelfwise.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response did not match the expected envelope or row shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raw row or position error.
    #[error(transparent)]
    Sheet(#[from] shelfwise_sheet::SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShelfError {
    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
