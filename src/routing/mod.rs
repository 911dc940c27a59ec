//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered route scan)
//!     → matcher.rs (literal prefix test)
//!     → Return: matched Route, or the default route
//!
//! Route Compilation (at startup):
//!     RouteConfig[] + DefaultRouteConfig
//!     → destination.rs (parse addresses/origins, fail fast)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod destination;
pub mod matcher;
pub mod router;

pub use destination::{Destination, LiteralResponder, Upstream, UpstreamKind};
pub use router::{Route, RouteTable};

/// A route whose destination cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route `{route}`: invalid local address `{address}`: {reason}")]
    InvalidAddress {
        route: String,
        address: String,
        reason: String,
    },

    #[error("route `{route}`: invalid remote origin `{origin}`: {reason}")]
    InvalidOrigin {
        route: String,
        origin: String,
        reason: String,
    },
}
