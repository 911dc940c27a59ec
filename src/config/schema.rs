//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//! Defaults reproduce the reference deployment, so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ordered route definitions. Declaration order is match order.
    pub routes: Vec<RouteConfig>,

    /// Fallback route used when no prefix matches.
    pub default_route: DefaultRouteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            routes: vec![
                RouteConfig {
                    name: "google".to_string(),
                    prefix: "/google".to_string(),
                    destination: DestinationConfig::Remote {
                        origin: "https://google.com".to_string(),
                    },
                    strip_prefix: None,
                },
                RouteConfig {
                    name: "go".to_string(),
                    prefix: "/go".to_string(),
                    destination: DestinationConfig::Literal {
                        body: "I'm Go!\r\n[{path}]\n".to_string(),
                    },
                    strip_prefix: None,
                },
                RouteConfig {
                    name: "node".to_string(),
                    prefix: "/node".to_string(),
                    destination: DestinationConfig::Local {
                        address: "localhost:9100".to_string(),
                    },
                    strip_prefix: None,
                },
            ],
            default_route: DefaultRouteConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Replace the port of the bind address, keeping its host.
    pub fn override_port(&mut self, port: u16) {
        let host = self
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.listener.bind_address = format!("{}:{}", host, port);
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// A prefix route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Literal path prefix. Matching is a plain starts-with test.
    pub prefix: String,

    /// Where matching requests go.
    pub destination: DestinationConfig,

    /// Remove the prefix before forwarding.
    /// Defaults to true for remote origins, false otherwise.
    #[serde(default)]
    pub strip_prefix: Option<bool>,
}

/// The always-matching fallback route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultRouteConfig {
    #[serde(default = "default_route_name")]
    pub name: String,

    pub destination: DestinationConfig,
}

fn default_route_name() -> String {
    "default".to_string()
}

impl Default for DefaultRouteConfig {
    fn default() -> Self {
        Self {
            name: default_route_name(),
            destination: DestinationConfig::Local {
                address: "localhost:9000".to_string(),
            },
        }
    }
}

/// Destination of a route, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationConfig {
    /// Plain HTTP backend at `host:port`.
    Local { address: String },

    /// HTTP(S) origin such as `https://example.com`.
    Remote { origin: String },

    /// Answered in-process. `{path}` in the body is replaced by the request path.
    Literal { body: String },
}

impl DestinationConfig {
    /// Strip policy when the route does not state one.
    pub fn strips_by_default(&self) -> bool {
        matches!(self, DestinationConfig::Remote { .. })
    }
}

/// Timeout configuration for upstream operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Maximum wait for the destination's response headers, in seconds.
    pub upstream_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            idle_secs: 90,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
