use crate::repository::Collection;
use shelfwise_sheet::SheetError;
use thiserror::Error;

/// Repository and shelf operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection} '{id}' not found")]
    NotFound { collection: Collection, id: String },

    #[error("position {position} on shelf '{shelf_id}' is already taken by '{product_id}'")]
    Occupied {
        shelf_id: String,
        position: String,
        product_id: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Position(#[from] SheetError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored record is not valid: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection,
            id: id.into(),
        }
    }
}

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;
