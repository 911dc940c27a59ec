//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with timeout
//! - Carry connect, response and idle limits from config
//! - Cancel operations cleanly on timeout (the wrapped future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutConfig;

/// Upstream limits, resolved from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    /// TCP (and TLS) connection establishment.
    pub connect: Duration,
    /// From sending the request to receiving response headers.
    pub response: Duration,
    /// How long an idle pooled connection is kept.
    pub idle: Duration,
}

impl From<&TimeoutConfig> for UpstreamTimeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_secs),
            response: Duration::from_secs(config.upstream_secs),
            idle: Duration::from_secs(config.idle_secs),
        }
    }
}

/// The deadline passed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no response within {0:?}")]
pub struct TimedOut(pub Duration);

/// Run `fut` to completion or give up after `limit`.
pub async fn deadline<F: Future>(limit: Duration, fut: F) -> Result<F::Output, TimedOut> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimedOut(limit))
}
