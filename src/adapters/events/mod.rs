//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process publish/subscribe bus
//! - `FnEventHandler` - Closure adapter for the `EventHandler` port
//! - `EventRecorder` - Opt-in handler that captures delivered events
//! - `publish_event` - Wraps a domain event in an envelope and publishes it

mod fn_handler;
mod in_memory;
mod recorder;

use serde::Serialize;

use crate::domain::foundation::{DomainError, DomainEvent, EventEnvelope};
use crate::ports::EventPublisher;

pub use fn_handler::FnEventHandler;
pub use in_memory::InMemoryEventBus;
pub use recorder::EventRecorder;

/// Serialize a domain event into an envelope and publish it.
///
/// # Errors
///
/// - `SerializationError` if the event cannot be rendered as JSON
/// - the first handler error raised during delivery
pub fn publish_event<E>(publisher: &dyn EventPublisher, event: &E) -> Result<(), DomainError>
where
    E: DomainEvent + Serialize,
{
    publisher.publish(EventEnvelope::from_event(event)?)
}
