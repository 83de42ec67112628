//! Observable scheduler state.
//!
//! The scheduler is a two-state machine: `Idle` between ticks and `Running`
//! while one collect + deliver cycle is in flight. The current state is
//! published on a `watch` channel so other components (and tests) can follow
//! transitions without touching the scheduler itself.

use std::fmt;

use tokio::sync::watch;
use tracing::trace;

/// Current phase of the scheduling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick.
    Idle,
    /// Inside the cycle for the given tick number (1-based).
    Running { tick: u64 },
}

impl SchedulerState {
    pub fn is_running(&self) -> bool {
        matches!(self, SchedulerState::Running { .. })
    }

    pub fn as_str(&self) -> &str {
        match self {
            SchedulerState::Idle => "Idle",
            SchedulerState::Running { .. } => "Running",
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "Idle"),
            SchedulerState::Running { tick } => write!(f, "Running (tick {})", tick),
        }
    }
}

/// Shared handle on the scheduler state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    state_tx: watch::Sender<SchedulerState>,
    state_rx: watch::Receiver<SchedulerState>,
}

impl SchedulerStatus {
    /// Creates a tracker in the `Idle` state.
    pub fn new() -> Self {
        let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);
        Self { state_tx, state_rx }
    }

    /// Returns a receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state_rx.clone()
    }

    pub fn current_state(&self) -> SchedulerState {
        *self.state_rx.borrow()
    }

    /// Idle -> Running.
    pub(crate) fn enter_running(&self, tick: u64) {
        self.set_state(SchedulerState::Running { tick });
    }

    /// Running -> Idle, regardless of how the cycle ended.
    pub(crate) fn enter_idle(&self) {
        self.set_state(SchedulerState::Idle);
    }

    fn set_state(&self, state: SchedulerState) {
        let old_state = self.state_tx.send_replace(state);
        trace!("Scheduler state changed: {} -> {}", old_state, state);
    }
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_running() {
        assert!(SchedulerState::Running { tick: 1 }.is_running());
        assert!(!SchedulerState::Idle.is_running());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SchedulerState::Idle.to_string(), "Idle");
        assert_eq!(
            SchedulerState::Running { tick: 3 }.to_string(),
            "Running (tick 3)"
        );
        assert_eq!(SchedulerState::Running { tick: 3 }.as_str(), "Running");
    }

    #[test]
    fn test_status_starts_idle() {
        let status = SchedulerStatus::new();
        assert_eq!(status.current_state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_transitions_are_observed() {
        let status = SchedulerStatus::new();
        let mut rx = status.subscribe();

        status.enter_running(1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SchedulerState::Running { tick: 1 });

        status.enter_idle();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let status = SchedulerStatus::new();
        let mut rx1 = status.subscribe();
        let mut rx2 = status.clone().subscribe();

        status.enter_running(7);
        rx1.changed().await.unwrap();
        rx2.changed().await.unwrap();
        assert_eq!(*rx1.borrow(), SchedulerState::Running { tick: 7 });
        assert_eq!(*rx2.borrow(), SchedulerState::Running { tick: 7 });
    }
}
