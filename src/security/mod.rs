//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request / relayed response:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//! ```
//!
//! # Design Decisions
//! - Connection-scoped headers never cross a hop
//! - The gateway performs no authentication (handled by destinations)

pub mod headers;
