//! Subscription domain module.
//!
//! Handles the subscription lifecycle: the state machine, the owning entity
//! and the events it emits.
//!
//! # Module Structure
//!
//! - `state` - SubscriptionState state machine and status tokens
//! - `aggregate` - Subscription entity
//! - `errors` - Lifecycle errors
//! - `terms` - Billing period and default plan
//! - `events` - Domain events

mod aggregate;
mod errors;
mod events;
mod state;
mod terms;

pub use aggregate::{Subscription, Transition};
pub use errors::SubscriptionError;
pub use events::SubscriptionStatusChanged;
pub use state::{SubscriptionAction, SubscriptionState};
pub use terms::BillingTerms;
