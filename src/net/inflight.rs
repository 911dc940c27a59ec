//! Per-request forward state and in-flight tracking.
//!
//! # Responsibilities
//! - Track each request through Received → Matched → Forwarding → Completed/Failed
//! - Count forwards currently waiting on a destination for response headers
//! - Detect requests abandoned mid-forward (caller disconnected)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Lifecycle state of one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardState {
    Received,
    Matched,
    Forwarding,
    Completed,
    Failed,
}

impl ForwardState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ForwardState::Completed | ForwardState::Failed)
    }
}

/// Counts in-flight forwards.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    active: Arc<AtomicU64>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a request that has just been received.
    pub fn receive(&self, request_id: impl Into<String>) -> ForwardGuard {
        ForwardGuard {
            active: Arc::clone(&self.active),
            request_id: request_id.into(),
            route: None,
            state: ForwardState::Received,
            counted: false,
        }
    }

    /// Forwards currently in the `Forwarding` state.
    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }
}

/// Guard that follows one request. Dropping it mid-forward marks it abandoned.
#[derive(Debug)]
pub struct ForwardGuard {
    active: Arc<AtomicU64>,
    request_id: String,
    route: Option<String>,
    state: ForwardState,
    counted: bool,
}

impl ForwardGuard {
    pub fn state(&self) -> ForwardState {
        self.state
    }

    pub fn matched(&mut self, route: &str) {
        self.route = Some(route.to_string());
        self.transition(ForwardState::Matched);
    }

    pub fn forwarding(&mut self) {
        if !self.counted {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            metrics::set_inflight(now);
            self.counted = true;
        }
        self.transition(ForwardState::Forwarding);
    }

    pub fn complete(mut self) {
        self.transition(ForwardState::Completed);
    }

    pub fn fail(mut self) {
        self.transition(ForwardState::Failed);
    }

    fn transition(&mut self, next: ForwardState) {
        if self.state.is_terminal() {
            return;
        }
        tracing::trace!(
            request_id = %self.request_id,
            from = ?self.state,
            to = ?next,
            "Forward state"
        );
        self.state = next;
    }
}

impl Drop for ForwardGuard {
    fn drop(&mut self) {
        if self.state == ForwardState::Forwarding {
            tracing::debug!(
                request_id = %self.request_id,
                route = self.route.as_deref().unwrap_or("unknown"),
                "Caller went away, forward abandoned"
            );
            self.state = ForwardState::Failed;
        }
        if self.counted {
            let now = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
            metrics::set_inflight(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_forwards() {
        let tracker = InFlightTracker::new();
        assert_eq!(tracker.active_count(), 0);

        let mut a = tracker.receive("a");
        a.matched("node");
        assert_eq!(tracker.active_count(), 0);
        a.forwarding();
        assert_eq!(tracker.active_count(), 1);

        let mut b = tracker.receive("b");
        b.matched("default");
        b.forwarding();
        assert_eq!(tracker.active_count(), 2);

        a.complete();
        assert_eq!(tracker.active_count(), 1);

        b.fail();
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn literal_routes_never_count() {
        let tracker = InFlightTracker::new();
        let mut guard = tracker.receive("c");
        guard.matched("go");
        assert_eq!(guard.state(), ForwardState::Matched);
        guard.complete();
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn dropped_mid_forward_releases_slot() {
        let tracker = InFlightTracker::new();
        let mut guard = tracker.receive("d");
        guard.matched("node");
        guard.forwarding();
        assert_eq!(tracker.active_count(), 1);
        drop(guard);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn terminal_state_is_final() {
        let tracker = InFlightTracker::new();
        let mut guard = tracker.receive("e");
        guard.transition(ForwardState::Failed);
        guard.transition(ForwardState::Forwarding);
        assert_eq!(guard.state(), ForwardState::Failed);
    }
}
