// Error types and their conversion into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Ways loading the catalog can fail. Both are shown to the user with a
// manual reload option; neither is retried automatically.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog source unreachable: {0}")]
    Unreachable(#[source] anyhow::Error),
    #[error("Invalid data format: {0}")]
    InvalidShape(String),
}

#[derive(Debug)]
pub enum AppError {
    InternalServerError(anyhow::Error),
    NotFound(String),
    // Catalog still loading, or the last load failed
    Unavailable(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::InternalServerError(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                // Don't expose internal details to the client
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::NotFound(message) => {
                tracing::info!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Unavailable(message) => {
                tracing::warn!("Catalog unavailable: {}", message);
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
