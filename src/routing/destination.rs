//! Compiled route destinations.
//!
//! Destinations are parsed once at startup. Anything that is not a valid
//! network location is rejected here so the listener never starts with a
//! route it cannot forward.

use axum::http::uri::{Authority, Scheme};
use url::Url;

use crate::config::schema::DestinationConfig;
use crate::routing::RouteError;

/// Where a matched request is sent.
#[derive(Debug, Clone)]
pub enum Destination {
    /// Forwarded over HTTP(S).
    Upstream(Upstream),
    /// Answered in-process.
    Literal(LiteralResponder),
}

impl Destination {
    /// Compile a destination from config. `route` is only used in errors.
    pub fn from_config(route: &str, config: &DestinationConfig) -> Result<Self, RouteError> {
        match config {
            DestinationConfig::Local { address } => Upstream::local(address)
                .map(Destination::Upstream)
                .map_err(|reason| RouteError::InvalidAddress {
                    route: route.to_string(),
                    address: address.clone(),
                    reason,
                }),
            DestinationConfig::Remote { origin } => Upstream::remote(origin)
                .map(Destination::Upstream)
                .map_err(|reason| RouteError::InvalidOrigin {
                    route: route.to_string(),
                    origin: origin.clone(),
                    reason,
                }),
            DestinationConfig::Literal { body } => {
                Ok(Destination::Literal(LiteralResponder::new(body.clone())))
            }
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::Upstream(upstream) => match upstream.kind() {
                UpstreamKind::Local => "local",
                UpstreamKind::Remote => "remote",
            },
            Destination::Literal(_) => "literal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// Backend on a local address. Sees the caller's Host header.
    Local,
    /// Public origin. Receives its own authority as Host.
    Remote,
}

/// An HTTP(S) destination.
#[derive(Debug, Clone)]
pub struct Upstream {
    kind: UpstreamKind,
    scheme: Scheme,
    authority: Authority,
    /// Origin path without trailing slash, "" for the root.
    base_path: String,
}

impl Upstream {
    /// Parse a local backend address of the form `host:port`.
    pub fn local(address: &str) -> Result<Self, String> {
        if address.contains('@') {
            return Err("userinfo is not allowed".to_string());
        }
        let authority: Authority = address.parse().map_err(|e| format!("{}", e))?;
        if authority.host().is_empty() {
            return Err("missing host".to_string());
        }
        if authority.port_u16().is_none() {
            return Err("missing port".to_string());
        }

        Ok(Self {
            kind: UpstreamKind::Local,
            scheme: Scheme::HTTP,
            authority,
            base_path: String::new(),
        })
    }

    /// Parse a remote origin such as `https://example.com` or `http://host:8080/base`.
    pub fn remote(origin: &str) -> Result<Self, String> {
        let url = Url::parse(origin).map_err(|e| e.to_string())?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(format!("unsupported scheme `{}`", other)),
        };
        let host = url.host_str().ok_or_else(|| "missing host".to_string())?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err("userinfo is not allowed".to_string());
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err("query and fragment are not allowed".to_string());
        }

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority: Authority = authority.parse().map_err(|e| format!("{}", e))?;

        Ok(Self {
            kind: UpstreamKind::Remote,
            scheme,
            authority,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    pub fn kind(&self) -> UpstreamKind {
        self.kind
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Whether the outbound Host header is replaced by this upstream's authority.
    pub fn rewrites_host(&self) -> bool {
        self.kind == UpstreamKind::Remote
    }
}

/// Fixed-text responder. `{path}` expands to the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralResponder {
    template: String,
}

impl LiteralResponder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, path: &str) -> String {
        self.template.replace("{path}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_address() {
        let upstream = Upstream::local("localhost:9100").unwrap();
        assert_eq!(upstream.kind(), UpstreamKind::Local);
        assert_eq!(upstream.scheme(), &Scheme::HTTP);
        assert_eq!(upstream.authority().as_str(), "localhost:9100");
        assert!(!upstream.rewrites_host());

        assert!(Upstream::local("127.0.0.1:9000").is_ok());
        assert!(Upstream::local("[::1]:9000").is_ok());
    }

    #[test]
    fn test_invalid_local_address() {
        assert!(Upstream::local("localhost").is_err());
        assert!(Upstream::local("localhost:notaport").is_err());
        assert!(Upstream::local("http://localhost:9000").is_err());
        assert!(Upstream::local("").is_err());
        assert!(Upstream::local("user@localhost:9000").is_err());
    }

    #[test]
    fn test_remote_origin() {
        let upstream = Upstream::remote("https://google.com").unwrap();
        assert_eq!(upstream.kind(), UpstreamKind::Remote);
        assert_eq!(upstream.scheme(), &Scheme::HTTPS);
        assert_eq!(upstream.authority().as_str(), "google.com");
        assert_eq!(upstream.base_path(), "");
        assert!(upstream.rewrites_host());

        let upstream = Upstream::remote("http://127.0.0.1:8080/base/").unwrap();
        assert_eq!(upstream.authority().as_str(), "127.0.0.1:8080");
        assert_eq!(upstream.base_path(), "/base");
    }

    #[test]
    fn test_invalid_remote_origin() {
        assert!(Upstream::remote("google.com").is_err());
        assert!(Upstream::remote("ftp://google.com").is_err());
        assert!(Upstream::remote("https://google.com/?q=1").is_err());
        assert!(Upstream::remote("https://user:pw@google.com").is_err());
    }

    #[test]
    fn test_literal_render() {
        let responder = LiteralResponder::new("I'm Go!\r\n[{path}]\n");
        assert_eq!(responder.render("/go/a"), "I'm Go!\r\n[/go/a]\n");
    }

    #[test]
    fn test_error_names_route() {
        let err = Destination::from_config(
            "node",
            &DestinationConfig::Local { address: "nope".into() },
        )
        .unwrap_err();
        assert!(err.to_string().contains("node"));
        assert!(err.to_string().contains("nope"));
    }
}
