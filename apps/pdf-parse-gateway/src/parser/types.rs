//! Parser Types
//!
//! Shapes exchanged with the document-parsing provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the page attribution of a document
pub const PAGE_KEY: &str = "page";

/// One unit of parsed content returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Extracted text (plain or markdown depending on provider settings)
    pub text: String,
    /// Provider metadata, possibly containing `page`
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ParsedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Page attribution as reported by the provider.
    ///
    /// Returns `None` when the provider supplied no page, or a page that is
    /// not an integer. No re-basing is applied.
    pub fn page(&self) -> Option<i64> {
        self.metadata.get(PAGE_KEY).and_then(Value::as_i64)
    }
}

/// Parser error types
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Request to parsing service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parsing service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Parse job {job_id} did not finish within {secs}s")]
    Timeout { job_id: String, secs: u64 },

    #[error("Invalid response from parsing service: {0}")]
    InvalidResponse(String),
}
