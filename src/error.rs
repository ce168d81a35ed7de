use crate::dtos::UploadResponse;
use crate::services::providers::ProviderError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Question is required")]
    QuestionRequired,

    #[error("Image file is required")]
    ImageRequired,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Processing error: {0}")]
    Processing(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Processing(anyhow::Error::new(err))
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Processing(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::QuestionRequired => {
                (StatusCode::BAD_REQUEST, "Question is required.".to_string())
            }
            ApiError::ImageRequired => (
                StatusCode::BAD_REQUEST,
                "Image file is required.".to_string(),
            ),
            ApiError::InvalidFileType => {
                (StatusCode::BAD_REQUEST, "Invalid file type.".to_string())
            }
            // Over-limit and malformed bodies keep the status the multipart
            // layer assigned (413 for size, otherwise 400).
            ApiError::Multipart(err) => (err.status(), err.body_text()),
            ApiError::Processing(err) => {
                tracing::error!("Error processing image upload: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing image.".to_string(),
                )
            }
            ApiError::ConfigError(err) => {
                tracing::error!("Configuration error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(UploadResponse::failure(message))).into_response()
    }
}
