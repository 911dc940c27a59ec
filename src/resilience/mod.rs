//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to destination:
//!     → timeouts.rs (connect limit on the connector, response deadline around the call)
//!     → On expiry: 504 Gateway Timeout, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Exactly one forwarding attempt per inbound request

pub mod timeouts;

pub use timeouts::{deadline, TimedOut, UpstreamTimeouts};
