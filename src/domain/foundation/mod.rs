//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event
//! infrastructure that form the vocabulary of the billing domain.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, EventType};
pub use ids::{CustomerId, SubscriptionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
