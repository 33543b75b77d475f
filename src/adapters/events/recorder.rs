//! Recording event handler.
//!
//! Captures every envelope it receives. Subscribe it to `EventType::any()`
//! to observe all traffic on a bus; the bus itself keeps no history.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{DomainError, EventEnvelope, EventType};
use crate::ports::{EventHandler, EventSubscriber};

/// Handler that keeps a copy of each event it is given.
///
/// # Example
///
/// ```ignore
/// let bus = InMemoryEventBus::new();
/// let recorder = EventRecorder::attach(&bus);
///
/// bus.publish(envelope)?;
///
/// assert!(recorder.has_event(&EventType::new("user.created")));
/// ```
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<EventEnvelope>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder and subscribe it to every event on `bus`.
    pub fn attach(bus: &dyn EventSubscriber) -> Arc<Self> {
        let recorder = Arc::new(Self::new());
        bus.subscribe(EventType::any(), Arc::clone(&recorder) as Arc<dyn EventHandler>);
        recorder
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All recorded events in delivery order.
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.lock().clone()
    }

    /// Recorded events of a type or any of its subtypes.
    pub fn events_of_type(&self, event_type: &EventType) -> Vec<EventEnvelope> {
        self.lock()
            .iter()
            .filter(|e| e.is_a(event_type))
            .cloned()
            .collect()
    }

    /// Recorded events for one aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.lock()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Checks if an event of this type (or a subtype) was recorded.
    pub fn has_event(&self, event_type: &EventType) -> bool {
        self.lock().iter().any(|e| e.is_a(event_type))
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventHandler for EventRecorder {
    fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.lock().push(event);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EventRecorder"
    }
}
