//! Parser Providers
//!
//! The capability the gateway delegates PDF parsing to.

use std::path::Path;

use async_trait::async_trait;

use super::types::{ParsedDocument, ParserError};

/// Document parsing provider
///
/// Implementations are shared read-only across concurrent requests.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Parse the file at `path` into an ordered sequence of documents
    async fn parse(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParserError>;
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockParser {
    pub documents: Vec<ParsedDocument>,
    pub error: Option<String>,
    pub seen: std::sync::Mutex<Vec<SeenUpload>>,
}

/// What the mock observed when it was called
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SeenUpload {
    pub path: std::path::PathBuf,
    pub contents: Vec<u8>,
}

#[cfg(test)]
impl MockParser {
    pub fn returning(documents: Vec<ParsedDocument>) -> Self {
        Self {
            documents,
            error: None,
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            documents: Vec::new(),
            error: Some(message.to_string()),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<SeenUpload> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentParser for MockParser {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn parse(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParserError> {
        let contents = tokio::fs::read(path).await?;
        self.seen.lock().unwrap().push(SeenUpload {
            path: path.to_path_buf(),
            contents,
        });

        match &self.error {
            Some(message) => Err(ParserError::Io(std::io::Error::other(message.clone()))),
            None => Ok(self.documents.clone()),
        }
    }
}
