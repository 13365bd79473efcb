//! Mailsift Server
//!
//! HTTP front end for the triage pipeline.
//!
//! # Endpoints
//!
//! - `POST /process_email`: multipart upload (`email_file`) → triage result
//! - `POST /detect_duplicates`: `{"email_texts": [...]}` → flagged pairs
//! - `GET /health`: liveness and backend info

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use mailsift_llm::{LlmBackend, LlmError};
use mailsift_triage::Triage;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// LLM backend could not be created
    #[error("LLM setup failed: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_level`. Calling this twice is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Start the HTTP server
///
/// Builds the configured LLM backend and triage pipeline, then serves until
/// Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(&config.log_level);
    config.validate()?;

    info!("Starting Mailsift server");
    info!("Bind address: {}", config.bind_addr());
    info!("Max upload: {} bytes", config.max_upload_bytes);
    info!("Request types: {}", config.triage.request_types.join(", "));

    let backend = LlmBackend::from_config(&config.llm)?;
    let triage = Triage::new(backend, config.triage.clone());
    let state = AppState::new(triage, config.llm.provider.to_string());

    let app = create_router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsift_llm::ProviderKind;

    #[tokio::test]
    async fn test_start_server_rejects_invalid_config() {
        let mut config = ServerConfig::default();
        config.max_upload_bytes = 0;
        config.llm.provider = ProviderKind::Mock;

        let result = start_server(config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_server_without_api_key() {
        let mut config = ServerConfig::default();
        config.llm.api_key_env = "MAILSIFT_SERVER_TEST_KEY_NEVER_SET".to_string();

        let result = start_server(config).await;
        assert!(matches!(result, Err(ServerError::Llm(_))));
    }
}
