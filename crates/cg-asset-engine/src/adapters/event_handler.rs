//! # Event Handler
//!
//! In-memory [`EventSink`] that records published envelopes for inspection.
//! Production deployments forward envelopes to a message bus.

use crate::events::EventEnvelope;
use crate::ports::outbound::EventSink;
use std::sync::Mutex;

/// Records every published event in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<EventEnvelope> {
        self.events.lock().unwrap().clone()
    }

    /// Number of published events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, envelope: EventEnvelope) {
        self.events.lock().unwrap().push(envelope);
    }
}

// =============================================================================
// TESTS
// =============================================================================
