//! Subscription domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CustomerId, EventId, SubscriptionId, Timestamp,
};

use super::{Subscription, SubscriptionState, Transition};

/// Published when a subscription's state was replaced.
///
/// No-op transitions (e.g. cancelling a cancelled subscription) do not
/// produce this event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatusChanged {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub customer_id: CustomerId,
    pub from: SubscriptionState,
    pub to: SubscriptionState,
    pub occurred_at: Timestamp,
}

impl SubscriptionStatusChanged {
    /// Build the event for a transition that changed the state.
    ///
    /// Returns `None` for a no-op transition.
    pub fn from_transition(subscription: &Subscription, transition: Transition) -> Option<Self> {
        if !transition.changed() {
            return None;
        }
        Some(Self {
            event_id: EventId::new(),
            subscription_id: subscription.id,
            customer_id: subscription.customer_id,
            from: transition.from,
            to: transition.to,
            occurred_at: subscription.updated_at,
        })
    }
}

domain_event!(
    SubscriptionStatusChanged,
    event_type = "billing.subscription.status_changed.v1",
    schema_version = 1,
    aggregate_id = subscription_id,
    aggregate_type = "Subscription",
    occurred_at = occurred_at,
    event_id = event_id
);
