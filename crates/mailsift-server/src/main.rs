//! Mailsift Server binary
//!
//! Starts the HTTP triage service.

use anyhow::Context;
use clap::Parser;
use mailsift_server::{config::ServerConfig, start_server};
use std::path::PathBuf;

/// Mailsift HTTP triage service
#[derive(Parser, Debug)]
#[command(name = "mailsift-server", version, about)]
struct Args {
    /// Load configuration from TOML file
    #[arg(short, long, env = "MAILSIFT_SERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets such as GOOGLE_API_KEY may live in .env
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            eprintln!("Warning: No config file specified, using defaults");
            eprintln!("Usage: mailsift-server --config <path-to-config.toml>");
            eprintln!();
            ServerConfig::default()
        }
    };

    start_server(config).await?;
    Ok(())
}
