//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::parser::DocumentParser;

/// Shared application state
///
/// Built once at startup and handed to every request. Holds no mutable
/// state, so handlers never contend on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    parser: Arc<dyn DocumentParser>,
}

impl AppState {
    pub fn new(config: Config, parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, parser }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document parser
    pub fn parser(&self) -> &dyn DocumentParser {
        self.inner.parser.as_ref()
    }

    /// Scratch directory for temp uploads
    pub fn upload_dir(&self) -> &Path {
        &self.inner.config.upload.dir
    }
}
