//! Cross-service events between user management and billing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, CustomerId, EventId, Timestamp, UserId};

/// Published by user management when a user signs up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub event_id: EventId,
    pub user_id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub occurred_at: Timestamp,
}

impl UserCreated {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            email: email.into(),
            display_name: None,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

domain_event!(
    UserCreated,
    event_type = "user.created.v1",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = occurred_at,
    event_id = event_id
);

/// Published by billing once a customer exists for a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCreated {
    pub event_id: EventId,
    pub customer_id: CustomerId,
    pub user_id: UserId,
    pub email: String,
    pub occurred_at: Timestamp,
}

impl CustomerCreated {
    pub fn new(customer_id: CustomerId, user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            customer_id,
            user_id,
            email: email.into(),
            occurred_at: Timestamp::now(),
        }
    }
}

domain_event!(
    CustomerCreated,
    event_type = "billing.customer.created.v1",
    schema_version = 1,
    aggregate_id = customer_id,
    aggregate_type = "Customer",
    occurred_at = occurred_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, EventEnvelope, EventType};

    #[test]
    fn user_created_is_a_user_event() {
        let event = UserCreated::new(UserId::new(), "ada@example.com");
        let envelope = EventEnvelope::from_event(&event).unwrap();

        assert!(envelope.is_a(&EventType::new("user.created")));
        assert!(envelope.is_a(&EventType::new("user")));
        assert!(!envelope.is_a(&EventType::new("billing")));
        assert_eq!(envelope.aggregate_id, event.user_id.to_string());
    }

    #[test]
    fn user_created_payload_round_trips_through_envelope() {
        let event = UserCreated::new(UserId::new(), "ada@example.com").with_display_name("Ada");
        let envelope = EventEnvelope::from_event(&event).unwrap();

        let back: UserCreated = envelope.payload_as().unwrap();

        assert_eq!(back, event);
    }

    #[test]
    fn user_created_without_display_name_omits_field() {
        let event = UserCreated::new(UserId::new(), "ada@example.com");
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("display_name").is_none());
    }

    #[test]
    fn customer_created_metadata() {
        let user_id = UserId::new();
        let event = CustomerCreated::new(CustomerId::from(user_id), user_id, "ada@example.com");

        assert_eq!(event.event_type(), "billing.customer.created.v1");
        assert_eq!(event.aggregate_type(), "Customer");
        assert_eq!(event.schema_version(), 1);
    }
}
