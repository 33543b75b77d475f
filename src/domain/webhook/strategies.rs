//! Standard webhook strategies.
//!
//! - `InvoicePaidStrategy` - payment succeeded, renew the customer's subscriptions
//! - `SubscriptionDeletedStrategy` - subscription ended at the provider, cancel locally
//! - `DefaultStrategy` - catch-all, acknowledges anything else
//!
//! Events that reference an unknown customer are acknowledged without
//! changes. The provider has no way to fix them by retrying.
//!
//! State changes made here publish `SubscriptionStatusChanged`, the same
//! event a direct status change emits.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, EventEnvelope, SubscriptionId, Timestamp};
use crate::domain::subscription::{
    BillingTerms, Subscription, SubscriptionStatusChanged, Transition,
};
use crate::ports::{CustomerRecord, CustomerRepository, EventPublisher, SubscriptionRepository};

use super::{customer_reference, WebhookError, WebhookStrategy};

/// Event type handled by [`InvoicePaidStrategy`].
pub const INVOICE_PAID: &str = "invoice.paid";

/// Event type handled by [`SubscriptionDeletedStrategy`].
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

fn find_customer(
    customers: &dyn CustomerRepository,
    data: &Value,
    event_type: &str,
) -> Result<Option<CustomerRecord>, WebhookError> {
    let Some(stripe_customer_id) = customer_reference(data) else {
        warn!(event_type, "Webhook event has no customer reference, acknowledging");
        return Ok(None);
    };

    let customer = customers.find_by_stripe_customer_id(stripe_customer_id)?;
    if customer.is_none() {
        info!(
            event_type,
            stripe_customer_id, "No billing customer for webhook event, acknowledging"
        );
    }
    Ok(customer)
}

fn publish_change(
    events: &dyn EventPublisher,
    subscription: &Subscription,
    transition: Option<Transition>,
) -> Result<(), DomainError> {
    match transition.and_then(|t| SubscriptionStatusChanged::from_transition(subscription, t)) {
        Some(event) => events.publish(EventEnvelope::from_event(&event)?),
        None => Ok(()),
    }
}

/// Renews every subscription of the paying customer.
///
/// Each subscription is activated and its `expires_at` moved to now plus
/// the billing period. A customer paying with no subscription yet gets a
/// new one on the plan named in `object.plan_id`, or the default plan.
pub struct InvoicePaidStrategy {
    customers: Arc<dyn CustomerRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    events: Arc<dyn EventPublisher>,
    terms: BillingTerms,
}

impl InvoicePaidStrategy {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        events: Arc<dyn EventPublisher>,
        terms: BillingTerms,
    ) -> Self {
        Self {
            customers,
            subscriptions,
            events,
            terms,
        }
    }

    fn plan_id<'a>(&'a self, data: &'a Value) -> &'a str {
        data.get("object")
            .and_then(|o| o.get("plan_id"))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.terms.default_plan_id.as_str())
    }
}

impl WebhookStrategy for InvoicePaidStrategy {
    fn supports(&self, event_type: &str) -> bool {
        event_type == INVOICE_PAID
    }

    fn handle(&self, data: &Value) -> Result<(), WebhookError> {
        let Some(customer) = find_customer(self.customers.as_ref(), data, INVOICE_PAID)? else {
            return Ok(());
        };

        let period_end = self.terms.period_end_from(Timestamp::now())?;
        let existing = self.subscriptions.find_by_customer(&customer.id)?;

        if existing.is_empty() {
            let subscription = Subscription::new(
                SubscriptionId::new(),
                customer.id,
                self.plan_id(data),
                period_end,
            );
            self.subscriptions.save(&subscription)?;
            info!(
                subscription_id = %subscription.id,
                customer_id = %customer.id,
                plan_id = %subscription.plan_id,
                "Subscription created from paid invoice"
            );
            return Ok(());
        }

        for subscription in existing {
            let mut transition = None;
            let updated = self.subscriptions.modify(
                &subscription.id,
                &mut |sub: &mut Subscription| {
                    transition = Some(sub.renew(period_end));
                    Ok(())
                },
            )?;
            info!(
                subscription_id = %updated.id,
                customer_id = %customer.id,
                status = updated.status(),
                "Subscription renewed after paid invoice"
            );
            publish_change(self.events.as_ref(), &updated, transition)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InvoicePaidStrategy"
    }
}

/// Cancels every subscription of the customer. Repeated deliveries are
/// harmless because cancel is idempotent.
pub struct SubscriptionDeletedStrategy {
    customers: Arc<dyn CustomerRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    events: Arc<dyn EventPublisher>,
}

impl SubscriptionDeletedStrategy {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            customers,
            subscriptions,
            events,
        }
    }
}

impl WebhookStrategy for SubscriptionDeletedStrategy {
    fn supports(&self, event_type: &str) -> bool {
        event_type == SUBSCRIPTION_DELETED
    }

    fn handle(&self, data: &Value) -> Result<(), WebhookError> {
        let Some(customer) =
            find_customer(self.customers.as_ref(), data, SUBSCRIPTION_DELETED)?
        else {
            return Ok(());
        };

        for subscription in self.subscriptions.find_by_customer(&customer.id)? {
            let mut transition = None;
            let updated = self.subscriptions.modify(
                &subscription.id,
                &mut |sub: &mut Subscription| {
                    transition = Some(sub.cancel());
                    Ok(())
                },
            )?;
            info!(
                subscription_id = %subscription.id,
                customer_id = %customer.id,
                changed = transition.map(|t| t.changed()).unwrap_or(false),
                "Subscription cancelled by provider"
            );
            publish_change(self.events.as_ref(), &updated, transition)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SubscriptionDeletedStrategy"
    }
}

/// Catch-all strategy. Accepts every event type and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStrategy;

impl WebhookStrategy for DefaultStrategy {
    fn supports(&self, _event_type: &str) -> bool {
        true
    }

    fn handle(&self, data: &Value) -> Result<(), WebhookError> {
        debug!(
            has_object = data.get("object").is_some(),
            "Unhandled webhook event acknowledged"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DefaultStrategy"
    }
}
