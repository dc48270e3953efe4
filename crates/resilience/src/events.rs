//! Event Bus - retry lifecycle notifications
//!
//! Design: every state transition of a retry is published as one event.
//! Type-safe enums over a tokio broadcast channel, no trait objects.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Retry state machine.
///
/// ```text
/// Idle → Attempting → Succeeded
///            ↓  ↑
///         Scheduled          (after a failure, budget left)
///            ↓
///   Exhausted | Cancelled    (terminal)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryState {
    Idle,
    Attempting,
    Scheduled { delay: Duration },
    Succeeded,
    Exhausted,
    Cancelled,
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RetryState::Succeeded | RetryState::Exhausted | RetryState::Cancelled
        )
    }
}

/// A transition of one retry run into `state` during attempt `attempt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryEvent {
    pub run_id: Uuid,
    pub attempt: u32,
    pub state: RetryState,
}

/// Simple event bus using tokio broadcast channel
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<RetryEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Slow subscribers lag (and skip events) past `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event
    pub fn publish(&self, event: RetryEvent) {
        let _ = self.tx.send(event); // Ignore error if no subscribers
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<RetryEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
