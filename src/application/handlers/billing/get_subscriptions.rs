//! GetSubscriptionsHandler - Query handler for a customer's subscriptions.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::{CustomerRepository, SubscriptionRepository};

/// Query for the subscriptions of one customer.
#[derive(Debug, Clone)]
pub struct GetSubscriptionsQuery {
    pub customer_id: CustomerId,
}

/// Read view of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    pub subscription_id: SubscriptionId,
    pub customer_id: CustomerId,
    pub plan_id: String,
    pub status: String,
    pub expires_at: Timestamp,
}

impl From<&Subscription> for SubscriptionView {
    fn from(sub: &Subscription) -> Self {
        Self {
            subscription_id: sub.id,
            customer_id: sub.customer_id,
            plan_id: sub.plan_id.clone(),
            status: sub.status().to_string(),
            expires_at: sub.expires_at,
        }
    }
}

/// Lists a customer's subscriptions.
pub struct GetSubscriptionsHandler {
    customers: Arc<dyn CustomerRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionsHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            customers,
            subscriptions,
        }
    }

    /// # Errors
    ///
    /// - `CustomerNotFound` if the customer doesn't exist
    pub fn handle(&self, query: GetSubscriptionsQuery) -> Result<Vec<SubscriptionView>, DomainError> {
        if !self.customers.exists(&query.customer_id)? {
            return Err(DomainError::new(
                ErrorCode::CustomerNotFound,
                format!("Customer {} not found", query.customer_id),
            ));
        }

        Ok(self
            .subscriptions
            .find_by_customer(&query.customer_id)?
            .iter()
            .map(SubscriptionView::from)
            .collect())
    }
}
