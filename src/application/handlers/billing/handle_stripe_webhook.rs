//! HandleStripeWebhookHandler - Command handler for payment provider webhooks.

use tracing::{info, warn};

use crate::config::WebhooksConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::webhook::{WebhookDispatcher, WebhookError, WebhookEvent};

/// Command to handle a webhook.
#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw webhook payload (JSON).
    pub payload: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleStripeWebhookResult {
    pub event_id: String,
    pub event_type: String,
    /// Name of the strategy that handled the event.
    pub handled_by: &'static str,
}

/// Parses webhook payloads and routes them through the dispatcher.
///
/// Signature verification happens before this handler is reached.
#[derive(Debug)]
pub struct HandleStripeWebhookHandler {
    dispatcher: WebhookDispatcher,
}

impl HandleStripeWebhookHandler {
    /// Creates the handler.
    ///
    /// # Errors
    ///
    /// With `strict_routing` on, returns `NoHandlerFound` if the dispatcher
    /// has no catch-all strategy. Otherwise that is only logged.
    pub fn new(dispatcher: WebhookDispatcher, config: &WebhooksConfig) -> Result<Self, DomainError> {
        if !dispatcher.has_catch_all() {
            if config.strict_routing {
                return Err(DomainError::new(
                    ErrorCode::NoHandlerFound,
                    "Webhook strategies have no catch-all",
                ));
            }
            warn!(
                strategies = ?dispatcher.strategy_names(),
                "Webhook strategies have no catch-all; unknown event types will fail"
            );
        }
        Ok(Self { dispatcher })
    }

    pub fn handle(
        &self,
        cmd: HandleStripeWebhookCommand,
    ) -> Result<HandleStripeWebhookResult, WebhookError> {
        let event = WebhookEvent::parse(&cmd.payload)?;

        let handled_by = self.dispatcher.dispatch(&event).map_err(|err| {
            warn!(
                event_id = %event.id,
                event_type = %event.event_type,
                retryable = err.is_retryable(),
                error = %err,
                "Webhook processing failed"
            );
            err
        })?;

        info!(
            event_id = %event.id,
            event_type = %event.event_type,
            handled_by,
            "Webhook processed"
        );

        Ok(HandleStripeWebhookResult {
            event_id: event.id,
            event_type: event.event_type,
            handled_by,
        })
    }
}
