//! ChangeSubscriptionStatusHandler - Command handler for subscription transitions.

use std::sync::Arc;

use tracing::info;

use crate::adapters::events::publish_event;
use crate::domain::foundation::{DomainError, SubscriptionId};
use crate::domain::subscription::{
    Subscription, SubscriptionAction, SubscriptionStatusChanged, Transition,
};
use crate::ports::{EventPublisher, SubscriptionRepository};

/// Command to apply a lifecycle action to a subscription.
#[derive(Debug, Clone)]
pub struct ChangeSubscriptionStatusCommand {
    pub subscription_id: SubscriptionId,
    pub action: SubscriptionAction,
}

/// Result of a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSubscriptionStatusResult {
    pub subscription_id: SubscriptionId,
    /// Status token after the action.
    pub status: &'static str,
    /// False when the action left the state as it was.
    pub changed: bool,
}

/// Applies `cancel`, `activate` or `mark_past_due` to a stored subscription.
///
/// Publishes `SubscriptionStatusChanged` when the state actually changed.
pub struct ChangeSubscriptionStatusHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChangeSubscriptionStatusHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscriptions,
            event_publisher,
        }
    }

    pub fn handle(
        &self,
        cmd: ChangeSubscriptionStatusCommand,
    ) -> Result<ChangeSubscriptionStatusResult, DomainError> {
        let mut transition: Option<Transition> = None;
        let updated = self.subscriptions.modify(
            &cmd.subscription_id,
            &mut |sub: &mut Subscription| {
                transition = Some(sub.apply(cmd.action)?);
                Ok(())
            },
        )?;

        let changed = transition.map(|t| t.changed()).unwrap_or(false);
        info!(
            subscription_id = %cmd.subscription_id,
            action = %cmd.action,
            status = updated.status(),
            changed,
            "Subscription action applied"
        );

        if let Some(event) = transition
            .and_then(|t| SubscriptionStatusChanged::from_transition(&updated, t))
        {
            publish_event(self.event_publisher.as_ref(), &event)?;
        }

        Ok(ChangeSubscriptionStatusResult {
            subscription_id: updated.id,
            status: updated.status(),
            changed,
        })
    }
}
