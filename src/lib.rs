//! Path-prefix HTTP gateway library.
//!
//! Routes each inbound request by literal path prefix to a local backend, a
//! remote origin, or an in-process literal responder, and streams the
//! destination's response back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
