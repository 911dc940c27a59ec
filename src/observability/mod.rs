//! Logs and metrics for the gateway.
//!
//! ```text
//! dispatch / ForwardGuard / startup
//!     → logging.rs: tracing events keyed by request_id and route (stdout)
//!     → metrics.rs: per-route request, error and in-flight series
//!                   (Prometheus scrape listener, off unless enabled)
//! ```
//!
//! `RUST_LOG` overrides the configured level. Without the exporter the
//! metric macros record into a no-op recorder.

pub mod logging;
pub mod metrics;
