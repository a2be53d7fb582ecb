//! PDF Parse Route
//!
//! `POST /parse_pdf/` accepts a multipart upload (field `file`), stores it
//! as a temp file, hands it to the configured [`DocumentParser`] and returns
//! the parsed chunks.
//!
//! Responses:
//! - 200 `{"chunks": [{"page": 1, "text": "..."}], "total_chunks": 1}`
//! - 400 `{"detail": "Only PDF files are accepted"}`
//! - 422 `{"detail": "Field required: file"}`
//! - 500 `{"detail": "Error parsing PDF: <message>"}`
//!
//! [`DocumentParser`]: crate::parser::DocumentParser

use std::path::Path;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::parser::ParsedDocument;
use crate::state::AppState;
use crate::upload::{is_pdf_filename, TempUpload, FILE_FIELD};

// ============================================================================
// Types
// ============================================================================

/// One parsed unit with optional page attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedChunk {
    pub page: Option<i64>,
    pub text: String,
}

/// Response body for a successful parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub chunks: Vec<ParsedChunk>,
    /// Always `chunks.len()`
    pub total_chunks: usize,
}

impl ParseResponse {
    /// Map provider documents to chunks, keeping provider order
    pub fn from_documents(documents: Vec<ParsedDocument>) -> Self {
        let chunks: Vec<ParsedChunk> = documents
            .into_iter()
            .map(|doc| ParsedChunk {
                page: doc.page(),
                text: doc.text,
            })
            .collect();
        let total_chunks = chunks.len();

        Self {
            chunks,
            total_chunks,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new().route("/parse_pdf/", post(parse_pdf))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /parse_pdf/
async fn parse_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResponse>, GatewayError> {
    let mut multipart = multipart.map_err(|e| GatewayError::Multipart(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(name = ?field.name(), "Skipping multipart field");
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        return handle_upload_pdf(&state, field, &filename).await.map(Json);
    }

    Err(GatewayError::MissingFile)
}

/// Validate, store, parse and clean up a single uploaded PDF.
///
/// The filename check happens before any I/O. The temp file lives exactly
/// as long as this call.
pub async fn handle_upload_pdf(
    state: &AppState,
    field: Field<'_>,
    filename: &str,
) -> Result<ParseResponse, GatewayError> {
    if !is_pdf_filename(filename) {
        return Err(GatewayError::InvalidInput);
    }

    let upload = save_upload(state.upload_dir(), field).await?;

    tracing::info!(
        filename = %filename,
        temp_file = %upload.path().display(),
        bytes = upload.bytes_written(),
        parser = state.parser().name(),
        "Parsing uploaded PDF"
    );

    let documents = state
        .parser()
        .parse(upload.path())
        .await
        .map_err(GatewayError::parse_failure)?;

    let response = ParseResponse::from_documents(documents);

    tracing::info!(
        filename = %filename,
        total_chunks = response.total_chunks,
        "Parsed {} chunks from PDF",
        response.total_chunks
    );

    Ok(response)
}

/// The body limit can trip while multer is still looking for the next
/// field header, before any field has been handed to us. That is the same
/// failed write as a limit hit mid-field, so both end up as `ParseFailure`.
fn multipart_error(error: MultipartError) -> GatewayError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::parse_failure(error)
    } else {
        GatewayError::Multipart(error.to_string())
    }
}

/// Stream the field to a fresh temp file
async fn save_upload(dir: &Path, mut field: Field<'_>) -> Result<TempUpload, GatewayError> {
    let mut upload = TempUpload::create(dir)
        .await
        .map_err(GatewayError::parse_failure)?;

    while let Some(chunk) = field.chunk().await.map_err(GatewayError::parse_failure)? {
        upload
            .write_chunk(&chunk)
            .await
            .map_err(GatewayError::parse_failure)?;
    }

    upload.finish().await.map_err(GatewayError::parse_failure)?;
    Ok(upload)
}
