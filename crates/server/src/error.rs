use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelfwise_core::ShelfError;
use shelfwise_slotting::FeeTableError;
use shelfwise_store::StoreError;
use thiserror::Error;

/// Errors returned to API clients as `{ "error": message }`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Occupied { .. } => ApiError::Conflict(err.to_string()),
            StoreError::Validation(_) | StoreError::Position(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::Io(_) | StoreError::Json(_) => {
                tracing::error!(error = %err, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        match err {
            ShelfError::Schema(_) | ShelfError::Sheet(_) | ShelfError::Json(_) => {
                ApiError::Unprocessable(err.to_string())
            }
            ShelfError::Http(_)
            | ShelfError::Config(_)
            | ShelfError::Io(_)
            | ShelfError::Yaml(_) => {
                tracing::error!(error = %err, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl From<FeeTableError> for ApiError {
    fn from(err: FeeTableError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
