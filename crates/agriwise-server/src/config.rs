//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, JWT secret,
//! token expiry, upload limits and loan policy overrides.

use agriwise_domain::LoanPolicy;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Loan policy overrides are inconsistent
    #[error("Invalid loan policy: {0}")]
    InvalidPolicy(#[from] agriwise_domain::ValidationError),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// JWT secret for signing and verifying bearer tokens
    pub jwt_secret: String,

    /// Token expiry in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// Log filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest accepted request body in bytes (default: 10 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Fixed seed for reproducible scoring; OS entropy when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Loan policy overrides
    #[serde(default)]
    pub loan_policy: LoanPolicy,
}

/// Default token expiry: 1 hour
fn default_token_expiry() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;

        // Validate required fields
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingField("jwt_secret".to_string()));
        }
        config.loan_policy.validate()?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            jwt_secret: "test-secret-key-do-not-use-in-production".to_string(),
            token_expiry_secs: 3600,
            log_level: default_log_level(),
            max_upload_bytes: default_max_upload_bytes(),
            rng_seed: None,
            loan_policy: LoanPolicy::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
