//! # Event Log Adapter
//!
//! `EventPublisher` that keeps events in memory and traces each one.

use crate::events::SplitterEvent;
use crate::ports::outbound::EventPublisher;
use parking_lot::RwLock;
use tracing::debug;

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<SplitterEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SplitterEvent> {
        self.events.read().clone()
    }

    /// Events published on `topic`.
    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Vec<SplitterEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.topic() == topic)
            .cloned()
            .collect()
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: SplitterEvent) {
        debug!(topic = event.topic(), ?event, "Event published");
        self.events.write().push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
