//! ProvisionCustomerHandler - Event handler for `user.created` events.
//!
//! Creates the billing customer for a newly registered user so billing
//! never has to call back into user management. The customer is created at
//! the payment provider first and stored with the provider id, which is how
//! later webhooks find it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, EventEnvelope, EventType,
};
use crate::domain::user::{CustomerCreated, UserCreated};
use crate::ports::{
    CreateCustomerRequest, CustomerRecord, CustomerRepository, EventHandler, EventPublisher,
    PaymentGateway,
};

/// Creates a billing customer for each new user.
///
/// The customer id is the user id. A user who already has a customer is
/// ignored, so redelivered events are harmless. When two deliveries race,
/// the repository insert picks one winner and only it publishes
/// `CustomerCreated`.
pub struct ProvisionCustomerHandler {
    customers: Arc<dyn CustomerRepository>,
    payments: Arc<dyn PaymentGateway>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ProvisionCustomerHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        payments: Arc<dyn PaymentGateway>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            customers,
            payments,
            event_publisher,
        }
    }

    /// Event type this handler should be subscribed to.
    pub fn subscribed_type() -> EventType {
        EventType::new("user.created")
    }
}

impl EventHandler for ProvisionCustomerHandler {
    fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let user: UserCreated = event
            .payload_as()
            .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;

        let customer_id = CustomerId::from(user.user_id);
        if self.customers.exists(&customer_id)? {
            debug!(user_id = %user.user_id, "Customer already exists, ignoring");
            return Ok(());
        }

        // Keyed by user id, so a racing delivery gets the same provider customer.
        let provider_customer = self.payments.create_customer(CreateCustomerRequest::for_user(
            user.user_id,
            user.email.clone(),
            user.display_name.clone(),
        ))?;

        let mut record = CustomerRecord::new(customer_id, user.email.clone())
            .with_stripe_customer_id(provider_customer.id.clone());
        record.display_name = user.display_name.clone();

        match self.customers.insert(&record) {
            Ok(()) => {}
            Err(err) if err.code == ErrorCode::AlreadyExists => {
                debug!(user_id = %user.user_id, "Customer created concurrently, ignoring");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        info!(
            user_id = %user.user_id,
            customer_id = %customer_id,
            stripe_customer_id = %provider_customer.id,
            "Customer provisioned"
        );

        let created = CustomerCreated::new(customer_id, user.user_id, user.email);
        let envelope = EventEnvelope::from_event(&created)?
            .with_causation_id(event.event_id.as_str());
        let envelope = match &event.metadata.correlation_id {
            Some(correlation_id) => envelope.with_correlation_id(correlation_id.clone()),
            None => envelope,
        };
        self.event_publisher.publish(envelope)
    }

    fn name(&self) -> &'static str {
        "ProvisionCustomerHandler"
    }
}
