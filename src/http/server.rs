//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all dispatcher
//! - Wire up middleware (tracing, request ID)
//! - Serve on the listener until shutdown
//! - Dispatch requests through the route table
//! - Forward requests to destinations and relay the response

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, DefaultBodyLimit, State},
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::client::{build_client, UpstreamClient};
use crate::http::request::{build_outbound, request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{relay, GatewayError};
use crate::net::InFlightTracker;
use crate::observability::metrics;
use crate::resilience::{deadline, UpstreamTimeouts};
use crate::routing::{Destination, Route, RouteError, RouteTable, Upstream};

/// Error building the server from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub client: UpstreamClient,
    pub timeouts: UpstreamTimeouts,
    pub inflight: InFlightTracker,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    routes: Arc<RouteTable>,
    inflight: InFlightTracker,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if any route destination is invalid.
    pub fn new(config: &ProxyConfig) -> Result<Self, ServerError> {
        let routes = Arc::new(RouteTable::from_config(config)?);
        let timeouts = UpstreamTimeouts::from(&config.timeouts);
        let client = build_client(&timeouts)?;
        let inflight = InFlightTracker::new();

        let state = AppState {
            routes: routes.clone(),
            client,
            timeouts,
            inflight: inflight.clone(),
        };

        Ok(Self {
            router: Self::build_router(state),
            routes,
            inflight,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// Run the server until a message arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.routes().len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Forwards currently waiting on a destination for response headers.
    pub fn inflight(&self) -> &InFlightTracker {
        &self.inflight
    }
}

/// Catch-all handler: match, then answer or forward.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    // Still percent-encoded; matching and stripping see what gets forwarded.
    let path = request.uri().path().to_string();

    let mut guard = state.inflight.receive(request_id.as_str());
    let route = state.routes.match_path(&path);
    guard.matched(route.name());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route.name(),
        destination = route.destination().kind(),
        "Route matched"
    );

    let response = match route.destination() {
        Destination::Literal(responder) => {
            guard.complete();
            responder.render(&path).into_response()
        }
        Destination::Upstream(upstream) => {
            guard.forwarding();
            match forward(&state, route, upstream, peer, request).await {
                Ok(response) => {
                    guard.complete();
                    response
                }
                Err(e) => {
                    guard.fail();
                    tracing::warn!(
                        request_id = %request_id,
                        route = %route.name(),
                        error = %e,
                        "Forward failed"
                    );
                    metrics::record_upstream_error(route.name(), e.kind());
                    e.into_response()
                }
            }
        }
    };

    let status = response.status();
    metrics::record_request(route.name(), method.as_str(), status.as_u16(), start_time);
    tracing::debug!(
        request_id = %request_id,
        status = status.as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Response headers sent"
    );

    response
}

/// One forwarding attempt. The response body is streamed, not awaited.
async fn forward(
    state: &AppState,
    route: &Route,
    upstream: &Upstream,
    peer: SocketAddr,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let outbound = build_outbound(route, upstream, peer, request)?;

    tracing::trace!(uri = %outbound.uri(), "Sending upstream request");

    let response = deadline(state.timeouts.response, state.client.request(outbound))
        .await?
        .map_err(GatewayError::Upstream)?;

    Ok(relay(response))
}
