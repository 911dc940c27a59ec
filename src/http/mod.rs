//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing (RouteTable::match_path)
//!     → literal destination: answered in place
//!     → upstream destination:
//!         request.rs (rewrite URI, prepare headers)
//!         → client.rs (pooled HTTP/HTTPS client, bounded wait)
//!         → response.rs (strip hop-by-hop, stream body back)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::GatewayError;
pub use server::{HttpServer, ServerError};
