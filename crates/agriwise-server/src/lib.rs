//! AgriWise Server
//!
//! REST surface for the agricultural assistant: bearer-token sessions, loan
//! risk assessment, and the simulated disease, voice, tips and analytics
//! endpoints.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod session;

use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Logging could not be initialised
    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

/// Start the HTTP server
///
/// Initializes logging and application state, then serves until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(&config.log_level)?;

    info!("Starting AgriWise Backend");
    info!("Bind address: {}", config.bind_addr());
    info!("Token expiry: {} seconds", config.token_expiry_secs);
    match config.rng_seed {
        Some(seed) => info!("Random source: seeded ({})", seed),
        None => info!("Random source: OS entropy"),
    }

    let state = AppState::from_config(&config);
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("AgriWise Backend listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("AgriWise Backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down AgriWise Backend...");
    }
}
