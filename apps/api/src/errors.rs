use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;

const UNSUPPORTED_FILE_MESSAGE: &str = "Unsupported file type. Please upload a PDF or Word document.";
const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract text from file.";
const GENERATION_FAILED_MESSAGE: &str = "Failed to generate resume content.";
const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Input problems surface with a descriptive message (400). Generation problems, provider
/// selection included, carry their detail for the server log only; the client gets a
/// generic message (500).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Please provide user details or upload a resume.")]
    MissingUserData,

    #[error("Please provide a job description.")]
    MissingJobDescription,

    #[error("Invalid model provider: {0}")]
    InvalidProvider(String),

    #[error("Model provider '{0}' is not supported yet.")]
    ProviderNotSupported(String),

    #[error("Invalid form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedType(mime) => AppError::UnsupportedFileType(mime),
            ExtractionError::Failed(detail) => AppError::ExtractionFailed(detail),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidProvider(_)
            | AppError::ProviderNotSupported(_)
            | AppError::GenerationFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Multipart(e) => e.status(),
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// The message the client sees. Never contains upstream or internal detail.
    pub fn client_message(&self) -> String {
        match self {
            AppError::UnsupportedFileType(_) => UNSUPPORTED_FILE_MESSAGE.to_string(),
            AppError::ExtractionFailed(_) => EXTRACTION_FAILED_MESSAGE.to_string(),
            AppError::InvalidProvider(_)
            | AppError::ProviderNotSupported(_)
            | AppError::GenerationFailed(_) => GENERATION_FAILED_MESSAGE.to_string(),
            AppError::Multipart(e) => e.body_text(),
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::GenerationFailed(detail) => {
                tracing::error!("Error generating resume: {detail}");
            }
            AppError::InvalidProvider(_) | AppError::ProviderNotSupported(_) => {
                tracing::error!("Error generating resume: {self}");
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
            }
            AppError::UnsupportedFileType(_) | AppError::ExtractionFailed(_) => {
                tracing::warn!("{self}");
            }
            _ => tracing::debug!("Rejected request: {self}"),
        }

        let body = Json(json!({ "error": self.client_message() }));
        (self.status(), body).into_response()
    }
}
