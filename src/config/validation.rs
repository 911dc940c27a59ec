//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every destination is a valid network location
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect routes that can never match
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;
use crate::routing::{Destination, RouteError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Destination(#[from] RouteError),

    #[error("route `{route}`: prefix must not be empty (use default_route instead)")]
    EmptyPrefix { route: String },

    #[error("route `{route}`: prefix `{prefix}` is already used by route `{earlier}` and can never match")]
    DuplicatePrefix {
        route: String,
        prefix: String,
        earlier: String,
    },

    #[error("{field}: invalid socket address `{address}`")]
    InvalidSocketAddress { field: &'static str, address: String },

    #[error("timeouts.{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddress {
            field: "listener.bind_address",
            address: config.listener.bind_address.clone(),
        });
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for route in &config.routes {
        if route.prefix.is_empty() {
            errors.push(ValidationError::EmptyPrefix {
                route: route.name.clone(),
            });
        } else if let Some(earlier) = seen.get(route.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                route: route.name.clone(),
                prefix: route.prefix.clone(),
                earlier: earlier.to_string(),
            });
        } else {
            seen.insert(&route.prefix, &route.name);
        }

        if let Err(e) = Destination::from_config(&route.name, &route.destination) {
            errors.push(e.into());
        }
    }

    let fallback = &config.default_route;
    if let Err(e) = Destination::from_config(&fallback.name, &fallback.destination) {
        errors.push(e.into());
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("idle_secs", timeouts.idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidSocketAddress {
            field: "observability.metrics_address",
            address: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
