//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the caller sent none
//! - Rewrite the URI for the matched route and destination
//! - Prepare headers for forwarding (hop-by-hop, X-Forwarded-*, Host)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The inbound request is consumed into a new outbound request; its body is
//!   moved, never buffered

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::{Route, Upstream};
use crate::security::headers::{append_forwarded, original_host, strip_hop_by_hop, ForwardedFor};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a UUID v4 for requests that arrive without an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID for logging. Set by the request-id layer before handlers run.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// URI the destination should see.
///
/// Scheme and authority come from the upstream, the path from the route's
/// rewrite policy (below the upstream base path), the query is kept verbatim.
pub fn forwarded_uri(route: &Route, upstream: &Upstream, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path = route.forward_path(original.path());

    let mut path_and_query = String::with_capacity(
        upstream.base_path().len() + path.len() + original.query().map_or(0, |q| q.len() + 1),
    );
    path_and_query.push_str(upstream.base_path());
    path_and_query.push_str(&path);
    if let Some(query) = original.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    Uri::builder()
        .scheme(upstream.scheme().clone())
        .authority(upstream.authority().clone())
        .path_and_query(path_and_query)
        .build()
}

/// Turn the inbound request into the request sent to `upstream`.
pub fn build_outbound(
    route: &Route,
    upstream: &Upstream,
    client_addr: SocketAddr,
    request: Request<Body>,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = request.into_parts();
    let uri = forwarded_uri(route, upstream, &parts.uri)?;

    let mut headers = parts.headers;
    let forwarded = ForwardedFor {
        client_ip: client_addr.ip(),
        host: original_host(&headers).or_else(|| {
            parts
                .uri
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
        }),
        proto: "http",
    };
    strip_hop_by_hop(&mut headers);
    append_forwarded(&mut headers, &forwarded);
    if upstream.rewrites_host() {
        headers.insert(header::HOST, HeaderValue::from_str(upstream.authority().as_str())?);
    }

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)?;
    *outbound.headers_mut() = headers;
    Ok(outbound)
}
