//! Incoming payment provider webhook events.
//!
//! Only the envelope fields needed for routing are typed; the event body is
//! kept as raw JSON and interpreted by the strategy that handles it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WebhookError;

/// Webhook event as delivered by Stripe (simplified).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type discriminator (e.g., "invoice.paid").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event body. Usually `{ "object": { ... } }`.
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    /// Parses a raw webhook payload.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the payload is not valid JSON or lacks `id`/`type`.
    pub fn parse(payload: &str) -> Result<Self, WebhookError> {
        serde_json::from_str(payload).map_err(|e| WebhookError::Parse(e.to_string()))
    }

    /// Provider customer id the event refers to, if any.
    pub fn customer_reference(&self) -> Option<&str> {
        customer_reference(&self.data)
    }
}

/// Reads `object.customer` from an event body.
///
/// Accepts both the collapsed form (`"cus_123"`) and an expanded customer
/// object (`{ "id": "cus_123", ... }`).
pub fn customer_reference(data: &Value) -> Option<&str> {
    let customer = data.get("object")?.get("customer")?;
    match customer {
        Value::String(id) => Some(id.as_str()),
        Value::Object(fields) => fields.get("id").and_then(Value::as_str),
        _ => None,
    }
    .filter(|id| !id.is_empty())
}
