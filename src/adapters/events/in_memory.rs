//! In-memory event bus.
//!
//! Delivers events synchronously, on the publisher's thread, to every
//! handler whose subscribed type the event's type is a subtype of.
//!
//! # Delivery order
//!
//! Subscribed types are kept in the order they were first subscribed, and
//! handlers within a type in the order they were added. `publish` walks
//! that registry front to back and stops at the first handler error.
//!
//! The bus keeps no record of published events. Attach an `EventRecorder`
//! to capture traffic.
//!
//! # Locking
//!
//! The registry sits behind an `RwLock`. Matching handlers are copied out
//! under the read lock and invoked after it is released, so a handler may
//! publish or subscribe itself. A poisoned lock is recovered: every write is
//! a single push and cannot leave the registry half-updated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, EventEnvelope, EventType};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

type Registry = Vec<(EventType, Vec<Arc<dyn EventHandler>>)>;

/// In-process publish/subscribe event bus.
///
/// Construct one per process (or per test) and share it by `Arc`.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.subscribe(EventType::new("user.created"), provisioner);
///
/// bus.publish(envelope)?;
/// ```
pub struct InMemoryEventBus {
    handlers: RwLock<Registry>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Total number of subscriptions across all types.
    pub fn handler_count(&self) -> usize {
        read(&self.handlers).iter().map(|(_, hs)| hs.len()).sum()
    }

    /// Subscribed types in first-subscription order.
    pub fn subscribed_types(&self) -> Vec<EventType> {
        read(&self.handlers).iter().map(|(t, _)| t.clone()).collect()
    }

    /// Handlers that would receive an event of this type, in delivery order.
    fn matching_handlers(&self, event_type: &EventType) -> Vec<Arc<dyn EventHandler>> {
        read(&self.handlers)
            .iter()
            .filter(|(subscribed, _)| event_type.is_a(subscribed))
            .flat_map(|(_, hs)| hs.iter().cloned())
            .collect()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let handlers = self.matching_handlers(&event.event_type);
        debug!(
            event_type = %event.event_type,
            event_id = event.event_id.as_str(),
            handlers = handlers.len(),
            "Publishing event"
        );

        for handler in handlers {
            if let Err(err) = handler.handle(event.clone()) {
                warn!(
                    event_type = %event.event_type,
                    event_id = event.event_id.as_str(),
                    handler = handler.name(),
                    error = %err,
                    "Event handler failed, stopping delivery"
                );
                return Err(err);
            }
        }

        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: EventType, handler: Arc<dyn EventHandler>) {
        debug!(event_type = %event_type, handler = handler.name(), "Subscribing handler");
        let mut registry = write(&self.handlers);
        match registry.iter_mut().find(|(t, _)| *t == event_type) {
            Some((_, handlers)) => handlers.push(handler),
            None => registry.push((event_type, vec![handler])),
        }
    }
}
