use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dataset::DatasetError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] core_types::CoreError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dataset(DatasetError::NotFound(path)) => {
                tracing::warn!(path = %path.display(), "Dataset file not found.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!(
                        "The dataset file {} was not found. Place it there and retry.",
                        path.display()
                    ),
                )
            }
            AppError::Dataset(dataset_err) => {
                tracing::error!(error = ?dataset_err, "Dataset error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("The dataset could not be loaded: {}", dataset_err),
                )
            }
            AppError::InvalidFilter(core_err) => (StatusCode::BAD_REQUEST, core_err.to_string()),
            AppError::Task(join_err) => {
                tracing::error!(error = ?join_err, "Loader task error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
