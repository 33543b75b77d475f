//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    ChangeSubscriptionStatusCommand, ChangeSubscriptionStatusHandler,
    ChangeSubscriptionStatusResult, GetSubscriptionsHandler, GetSubscriptionsQuery,
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, HandleStripeWebhookResult,
    ProvisionCustomerHandler, SubscriptionView,
};
