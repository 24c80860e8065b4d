//! AgriWise Server CLI
//!
//! Starts the HTTP API server.

use agriwise_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: agriwise-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("AgriWise Server - Agricultural assistant REST API");
    println!();
    println!("USAGE:");
    println!("    agriwise-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '0.0.0.0')");
    println!("    - bind_port: Port number (e.g., 8000)");
    println!("    - jwt_secret: Secret key for bearer token signing");
    println!("    - token_expiry_secs: Token expiry in seconds (default: 3600)");
    println!("    - log_level: Log filter when RUST_LOG is unset (default: info)");
    println!("    - max_upload_bytes: Request body limit (default: 10485760)");
    println!("    - rng_seed: Optional fixed seed for reproducible scoring");
    println!("    - [loan_policy]: Optional overrides of the loan policy constants");
    println!();
}
