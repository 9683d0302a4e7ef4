//! Aerobook Web Server
//!
//! Tenant-aware flight booking service with per-client rate limiting
//! and role-based access.

use aerobook_core::{init_logging, LoggingConfig};
use aerobook_web::server::AerobookServerBuilder;
use aerobook_web::WebConfig;
use clap::Parser;

/// Aerobook web server - tenant-aware flight booking service
#[derive(Parser)]
#[command(name = "aerobook-web")]
#[command(about = "Web server for the Aerobook booking service")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let logging = LoggingConfig {
        level: args.log_level.clone(),
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut config = WebConfig::from_env();
    config.host = args.host;
    config.port = args.port;
    config.dev_mode = args.dev;

    let server = AerobookServerBuilder::new()
        .host(config.host.clone())
        .port(config.port)
        .dev_mode(config.dev_mode)
        .build()?;

    server.start().await?;
    Ok(())
}
