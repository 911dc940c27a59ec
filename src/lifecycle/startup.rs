//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Compile the route table and upstream client
//! - Start the metrics endpoint when enabled
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Anything that stops the gateway from coming up (or from serving).
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("Metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the gateway and block until it has shut down.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let server = HttpServer::new(&config)?;
    for route in server.routes().routes() {
        tracing::info!(
            route = %route.name(),
            prefix = %route.prefix(),
            destination = route.destination().kind(),
            strip_prefix = route.strip_prefix(),
            "Route registered"
        );
    }
    tracing::info!(
        route = %server.routes().fallback().name(),
        destination = server.routes().fallback().destination().kind(),
        "Default route registered"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
