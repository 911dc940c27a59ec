//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → listener.rs (bind the single public endpoint)
//!     → Hand off to HTTP layer (axum::serve, one task per connection)
//!
//! Per request:
//!     inflight.rs tracks Received → Matched → Forwarding → Completed | Failed
//! ```
//!
//! # Design Decisions
//! - Bind errors are fatal and surface before traffic is accepted
//! - Each forward holds a guard; release happens on drop, on every exit path

pub mod inflight;
pub mod listener;

pub use inflight::{ForwardGuard, ForwardState, InFlightTracker};
pub use listener::{bind, ListenerError};
