//! Outbound HTTP client.
//!
//! One pooled client is shared by every request. It speaks plain HTTP to
//! local backends and HTTPS (rustls, webpki roots) to remote origins.

use axum::body::Body;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::resilience::UpstreamTimeouts;

/// Type alias for the client used to reach destinations.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Create the shared client.
pub fn build_client(timeouts: &UpstreamTimeouts) -> Result<UpstreamClient, rustls::Error> {
    let mut http_connector = HttpConnector::new();
    http_connector.set_connect_timeout(Some(timeouts.connect));
    http_connector.set_nodelay(true);
    http_connector.enforce_http(false); // Allow both HTTP and HTTPS

    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
        .https_or_http()
        .enable_http1()
        .wrap_connector(http_connector);

    let client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(timeouts.idle)
        .build(https_connector);

    tracing::debug!(
        connect_timeout = ?timeouts.connect,
        idle_timeout = ?timeouts.idle,
        "Upstream client configured"
    );

    Ok(client)
}
