//! Closure-backed event handler.

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Wraps a named closure as an [`EventHandler`].
///
/// # Example
///
/// ```ignore
/// let audit = FnEventHandler::new("AuditLog", |event| {
///     tracing::info!(event_type = %event.event_type, "audit");
///     Ok(())
/// });
/// bus.subscribe(EventType::any(), Arc::new(audit));
/// ```
pub struct FnEventHandler<F> {
    name: &'static str,
    handler: F,
}

impl<F> FnEventHandler<F>
where
    F: Fn(EventEnvelope) -> Result<(), DomainError> + Send + Sync,
{
    pub fn new(name: &'static str, handler: F) -> Self {
        Self { name, handler }
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(EventEnvelope) -> Result<(), DomainError> + Send + Sync,
{
    fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        (self.handler)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
