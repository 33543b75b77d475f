//! The webhook strategy contract.

use serde_json::Value;

use super::WebhookError;

/// Handler for one family of webhook event types.
///
/// Strategies are checked in the order the dispatcher holds them; the first
/// one whose `supports` returns true handles the event.
pub trait WebhookStrategy: Send + Sync {
    /// Returns true if this strategy handles the given event type.
    fn supports(&self, event_type: &str) -> bool;

    /// Handles the event body (`data` of the webhook event).
    fn handle(&self, data: &Value) -> Result<(), WebhookError>;

    /// Strategy name for logging and results.
    fn name(&self) -> &'static str;
}
