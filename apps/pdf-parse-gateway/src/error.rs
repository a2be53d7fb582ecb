//! Error types for the PDF parse gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-level error returned by the upload handler
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Client sent something other than a `.pdf`
    #[error("Only PDF files are accepted")]
    InvalidInput,

    /// Writing the upload or calling the parser failed
    #[error("Error parsing PDF: {0}")]
    ParseFailure(anyhow::Error),

    #[error("Field required: file")]
    MissingFile,

    #[error("Invalid multipart body: {0}")]
    Multipart(String),
}

impl GatewayError {
    pub fn parse_failure<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ParseFailure(anyhow::Error::new(error))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ParseFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            // `{:?}` on anyhow prints the cause chain and the captured backtrace
            GatewayError::ParseFailure(e) => tracing::error!("Error parsing PDF: {:?}", e),
            other => tracing::warn!(status = status.as_u16(), "Rejected upload: {}", other),
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
