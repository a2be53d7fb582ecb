//! Parser Module
//!
//! The external document-parsing capability. The gateway only knows the
//! [`DocumentParser`] trait; [`LlamaParseClient`] is the production provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdf_parse_gateway::parser::{DocumentParser, LlamaParseClient};
//!
//! let client = LlamaParseClient::new(config.parser.clone())?;
//! let documents = client.parse(Path::new("uploaded_files/report.pdf")).await?;
//! for doc in &documents {
//!     println!("{:?}: {}", doc.page(), doc.text);
//! }
//! ```

mod llama;
mod provider;
mod types;

pub use llama::LlamaParseClient;
pub use provider::DocumentParser;
pub use types::{ParsedDocument, ParserError, PAGE_KEY};

#[cfg(test)]
pub use provider::{MockParser, SeenUpload};
