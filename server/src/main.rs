//! Server entrypoint for reelmatch
//!
//! Binds the TCP listener, spawns the session coordinator, and hands
//! each accepted connection to its own task. Wiring between layers
//! happens here and nowhere else.

mod connection;
mod protocol;

use anyhow::Result;
use clap::Parser;
use reelmatch_application::SessionCoordinator;
use reelmatch_infrastructure::ConfigLoader;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelmatch-server", about = "Session relay for group movie matching")]
struct Cli {
    /// Path to a TOML config file (defaults to ./reelmatch.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = ConfigLoader::load(cli.config.as_ref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if config.tmdb.api_key.is_empty() {
        warn!("no TMDB API key configured; clients must supply their own catalog access");
    }

    let coordinator = SessionCoordinator::spawn();
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server running on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "client connected");
        tokio::spawn(connection::handle_connection(stream, coordinator.clone()));
    }
}
