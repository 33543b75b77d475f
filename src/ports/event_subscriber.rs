//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! This port defines how handlers register interest in domain events
//! without knowing about the underlying delivery mechanism.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope, EventType};

/// Handler for processing domain events.
///
/// Handlers run synchronously on the publisher's thread. An error returned
/// here stops delivery of the event to any handler after this one.
///
/// # Example
///
/// ```ignore
/// struct WelcomeMailer { /* ... */ }
///
/// impl EventHandler for WelcomeMailer {
///     fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: UserCreated = event.payload_as()?;
///         // Queue the mail...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "WelcomeMailer"
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Process an event.
    fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// A handler subscribed to a type also receives every subtype of it:
/// subscribing to `"user"` covers `"user.created.v1"`, and
/// [`EventType::any`] covers everything.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe(EventType::new("user.created"), provisioner);
/// subscriber.subscribe_all(&[EventType::new("billing"), EventType::new("user")], auditor);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to an event type and all of its subtypes.
    fn subscribe(&self, event_type: EventType, handler: Arc<dyn EventHandler>);

    /// Subscribe the same handler to several event types.
    fn subscribe_all(&self, event_types: &[EventType], handler: Arc<dyn EventHandler>) {
        for event_type in event_types {
            self.subscribe(event_type.clone(), Arc::clone(&handler));
        }
    }
}

/// Combined trait for event bus implementations.
///
/// An EventBus provides both publishing and subscribing capabilities.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that traits are object-safe
    #[allow(dead_code)]
    fn assert_handler_object_safe(_: &dyn EventHandler) {}

    #[allow(dead_code)]
    fn assert_subscriber_object_safe(_: &dyn EventSubscriber) {}

    #[allow(dead_code)]
    fn assert_bus_object_safe(_: &dyn EventBus) {}
}
