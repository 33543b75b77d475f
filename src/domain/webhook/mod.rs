//! Webhook domain module.
//!
//! Routes payment provider webhook events to a strategy chosen by event
//! type.
//!
//! # Module Structure
//!
//! - `event` - Parsed webhook envelope
//! - `strategy` - The `WebhookStrategy` contract
//! - `strategies` - Standard strategies (invoice paid, subscription deleted, catch-all)
//! - `dispatcher` - First-match routing over an ordered strategy list
//! - `errors` - Webhook error types

mod dispatcher;
mod errors;
mod event;
mod strategies;
mod strategy;

pub use dispatcher::WebhookDispatcher;
pub use errors::WebhookError;
pub use event::{customer_reference, WebhookEvent};
pub use strategies::{
    DefaultStrategy, InvoicePaidStrategy, SubscriptionDeletedStrategy, INVOICE_PAID,
    SUBSCRIPTION_DELETED,
};
pub use strategy::WebhookStrategy;
