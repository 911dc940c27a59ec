//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the destination's response to the caller
//! - Remove hop-by-hop headers
//! - Map forwarding failures to gateway status codes
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - Backend timeouts result in 504 Gateway Timeout
//! - Everything else that goes wrong with the destination is 502 Bad Gateway

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;

use crate::resilience::TimedOut;
use crate::security::headers::strip_hop_by_hop;

/// Why a request could not be forwarded.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connect failure, reset, or a response hyper could not parse.
    #[error("upstream request failed: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    #[error("upstream timed out: {0}")]
    Timeout(#[from] TimedOut),

    /// The rewritten request was not a valid HTTP request.
    #[error("could not build upstream request: {0}")]
    Request(#[from] axum::http::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(_) | GatewayError::Request(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(e) if e.is_connect() => "unreachable",
            GatewayError::Upstream(_) => "protocol",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::Request(_) => "request",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let message = match self.status() {
            StatusCode::GATEWAY_TIMEOUT => "Upstream timed out",
            _ => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}

/// Relay a destination response. The body is passed through as a stream.
pub fn relay(response: Response<Incoming>) -> axum::response::Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
