//! prefix-gateway
//!
//! A single listener that forwards requests by path prefix.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 PREFIX GATEWAY               │
//!     Client Request    │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!     ──────────────────┼─▶│  net    │──▶│  http    │──▶│  routing  │  │
//!                       │  │listener │   │ server   │   │route table│  │
//!                       │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                       │                                     │        │
//!                       │               literal ◀─────────────┤        │
//!                       │                                     ▼        │
//!     Client Response   │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!     ◀─────────────────┼──│ response │◀──│  client  │◀──│ request  │◀─┼──── Backend /
//!                       │  │  relay   │   │ (pooled) │   │ rewrite  │  │     Remote origin
//!                       │  └──────────┘   └──────────┘   └──────────┘  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use prefix_gateway::config::{load_config, ProxyConfig};
use prefix_gateway::lifecycle;
use prefix_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "prefix-gateway", version)]
#[command(about = "Forward HTTP requests to backends by path prefix", long_about = None)]
struct Cli {
    /// TOML configuration file. Without one the reference routes are used.
    #[arg(short, long, env = "PREFIX_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener port (replaces the port of listener.bind_address).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = cli.port {
        config.override_port(port);
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    init_logging(&config.observability);

    tracing::info!("prefix-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
