//! Audit sink implementations.
//!
//! Every state transition can be recorded for later inspection.

use std::collections::VecDeque;

use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    /// Event identifier.
    pub event_id: String,
    /// Resource identifier.
    pub resource: String,
    /// Reservation generation the transition belongs to.
    pub generation: u64,
    /// Holder of the reservation.
    pub holder: String,
    /// Action taken (reserve, onset, expire, release).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: TransitionEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<TransitionEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: TransitionEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that shares its buffer with the caller, so tests can read what a
/// scheduler recorded after handing the sink over.
#[derive(Clone)]
pub struct SharedAuditSink {
    inner: std::sync::Arc<parking_lot::Mutex<InMemoryAuditSink>>,
}

impl SharedAuditSink {
    /// Create a shared sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: std::sync::Arc::new(parking_lot::Mutex::new(InMemoryAuditSink::new(max_events))),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.inner.lock().events()
    }
}

impl AuditSink for SharedAuditSink {
    fn record(&mut self, event: TransitionEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build a transition event with a fresh id.
pub fn build_transition_event(
    resource: impl Into<String>,
    generation: u64,
    holder: impl Into<String>,
    action: impl Into<String>,
    payload: Option<String>,
) -> TransitionEvent {
    TransitionEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        resource: resource.into(),
        generation,
        holder: holder.into(),
        action: action.into(),
        created_at_ms: now_ms(),
        payload,
    }
}
