//! PDF Parse Gateway Server
//!
//! Single-endpoint service: upload a PDF to `POST /parse_pdf/`, get back the
//! chunks LlamaParse extracted from it.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_parse_gateway::config::Config;
use pdf_parse_gateway::parser::LlamaParseClient;
use pdf_parse_gateway::state::AppState;
use pdf_parse_gateway::upload;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading RUST_LOG and the API key
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_parse_gateway=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };

    tracing::info!("Starting PDF Parse Gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("LlamaParse endpoint: {}", config.parser.base_url);
    tracing::info!("Result type: {:?}", config.parser.result_type);

    upload::ensure_upload_dir(&config.upload.dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.upload.dir.display()))?;

    let parser = LlamaParseClient::new(config.parser.clone())
        .context("Failed to initialize LlamaParse client")?;

    let app_state = AppState::new(config.clone(), Arc::new(parser));
    let app = pdf_parse_gateway::app(app_state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    tracing::info!("PDF Parse Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
