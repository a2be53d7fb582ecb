//! PDF Parse Gateway
//!
//! Accepts PDF uploads over HTTP, parses them through LlamaParse and returns
//! the text chunks as JSON. The binary in `main.rs` wires configuration and
//! the production parser; everything here is usable from tests with a mock
//! [`parser::DocumentParser`].
//!
//! # Modules
//!
//! - `config`: environment-driven configuration
//! - `error`: request error taxonomy and its HTTP mapping
//! - `parser`: provider trait and the LlamaParse client
//! - `routes`: `POST /parse_pdf/` and `GET /health`
//! - `state`: shared application state
//! - `upload`: upload directory and request-scoped temp files

pub mod config;
pub mod error;
pub mod parser;
pub mod routes;
pub mod state;
pub mod upload;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::parse::router())
        .layer(DefaultBodyLimit::max(state.config().upload.max_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
