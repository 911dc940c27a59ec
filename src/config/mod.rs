//! Gateway configuration.
//!
//! ```text
//! TOML file (optional, --config / PREFIX_GATEWAY_CONFIG)
//!     → loader.rs: toml → ProxyConfig, every section defaulted
//!     → validation.rs: addresses, prefixes, destinations, timeouts
//!     → main: --port / PORT and --log-level applied on top
//! ```
//!
//! An empty or absent file describes the reference deployment: `/google`,
//! `/go` and `/node` routes plus the default backend on port 9000.
//! Configuration is read once at startup.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DefaultRouteConfig, DestinationConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, RouteConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
