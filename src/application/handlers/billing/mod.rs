//! Billing handlers.
//!
//! ## Commands
//! - Processing payment provider webhooks
//! - Changing a subscription's status
//!
//! ## Queries
//! - Listing a customer's subscriptions
//!
//! ## Event Handlers
//! - Provisioning a billing customer when a user is created

mod change_subscription_status;
mod get_subscriptions;
mod handle_stripe_webhook;
mod provision_customer;

// Commands
pub use change_subscription_status::{
    ChangeSubscriptionStatusCommand, ChangeSubscriptionStatusHandler,
    ChangeSubscriptionStatusResult,
};
pub use handle_stripe_webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, HandleStripeWebhookResult,
};

// Queries
pub use get_subscriptions::{GetSubscriptionsHandler, GetSubscriptionsQuery, SubscriptionView};

// Event handlers
pub use provision_customer::ProvisionCustomerHandler;
