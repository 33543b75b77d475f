//! Event infrastructure for domain event publishing and handling.
//!
//! This module provides the core types and traits for event-driven architecture:
//! - `EventId` - Unique identifier for events (deduplication)
//! - `EventType` - Hierarchical type tag used for routing
//! - `EventMetadata` - Tracing and correlation context
//! - `EventEnvelope` - Transport wrapper for domain events
//! - `DomainEvent` - Trait that all domain events implement
//! - `domain_event!` - Macro to simplify DomainEvent implementations

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

// ============================================
// DomainEvent Trait
// ============================================

/// Trait that all domain events must implement.
///
/// Provides the contract for event identification, routing, ordering, and versioning.
/// Use the `domain_event!` macro to implement this trait with minimal boilerplate.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string (e.g., "user.created.v1").
    /// Used for routing; dot-separated prefixes name its supertypes.
    fn event_type(&self) -> &'static str;

    /// Returns the schema version number.
    /// MUST match the version suffix in event_type.
    fn schema_version(&self) -> u32;

    /// Returns the ID of the aggregate that emitted this event.
    fn aggregate_id(&self) -> String;

    /// Returns the type of aggregate (e.g., "Customer", "Subscription").
    fn aggregate_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Macro to implement DomainEvent trait with minimal boilerplate.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct UserCreated {
///     pub event_id: EventId,
///     pub user_id: UserId,
///     pub email: String,
///     pub occurred_at: Timestamp,
/// }
///
/// domain_event!(
///     UserCreated,
///     event_type = "user.created.v1",
///     schema_version = 1,
///     aggregate_id = user_id,
///     aggregate_type = "User",
///     occurred_at = occurred_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        schema_version = $schema_version:expr,
        aggregate_id = $agg_id_field:ident,
        aggregate_type = $agg_type:expr,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn schema_version(&self) -> u32 {
                $schema_version
            }

            fn aggregate_id(&self) -> String {
                self.$agg_id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $agg_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field.clone()
            }
        }
    };
}

pub use crate::domain_event;

/// Unique identifier for events (used for deduplication).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// EventType
// ============================================

const ANY_EVENT_TYPE: &str = "*";

/// Hierarchical event type tag.
///
/// Types are dot-separated names where every segment prefix names a supertype:
/// `billing.customer.created.v1` is a `billing.customer.created`, a
/// `billing.customer`, a `billing`, and (like every type) an [`EventType::any`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    /// Creates an event type from its dotted name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root type every event is an instance of.
    pub fn any() -> Self {
        Self(ANY_EVENT_TYPE.to_string())
    }

    /// Returns the dotted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the root type.
    pub fn is_any(&self) -> bool {
        self.0 == ANY_EVENT_TYPE
    }

    /// Returns true if `self` is `ancestor` or one of its subtypes.
    ///
    /// Matching is on whole segments: `billing.customer` is not an ancestor of
    /// `billing.customers.created`.
    pub fn is_a(&self, ancestor: &EventType) -> bool {
        if ancestor.is_any() {
            return true;
        }
        match self.0.strip_prefix(ancestor.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }

    /// Returns the immediate supertype, or `None` for the root.
    pub fn parent(&self) -> Option<EventType> {
        if self.is_any() {
            return None;
        }
        match self.0.rsplit_once('.') {
            Some((parent, _)) => Some(EventType::new(parent)),
            None => Some(EventType::any()),
        }
    }

    /// Extracts the schema version from a `.vN` suffix, defaulting to 1.
    pub fn version(&self) -> u32 {
        self.0
            .rsplit_once(".v")
            .and_then(|(_, version_str)| version_str.parse::<u32>().ok())
            .unwrap_or(1)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Metadata for tracing and correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// ID linking related events across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// ID of the event that directly caused this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
}

/// Transport envelope for domain events.
///
/// Wraps event-specific data with metadata needed for:
/// - Routing (event_type)
/// - Deduplication (event_id)
/// - Correlation (aggregate_id, metadata)
/// - Versioning (schema_version)
///
/// Envelopes are fully populated before publishing and never mutated by the
/// bus; each handler receives its own clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this event instance.
    pub event_id: EventId,

    /// Event type for routing (e.g., "user.created.v1").
    pub event_type: EventType,

    /// Schema version number (extracted from event_type).
    pub schema_version: u32,

    /// ID of the aggregate that emitted this event.
    pub aggregate_id: String,

    /// Type of aggregate (e.g., "User", "Subscription").
    pub aggregate_type: String,

    /// When the event occurred.
    pub occurred_at: Timestamp,

    /// Event-specific payload as JSON.
    pub payload: JsonValue,

    /// Tracing and correlation metadata.
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Creates a new EventEnvelope with required fields.
    ///
    /// The schema version is taken from the event type's `.vN` suffix.
    pub fn new(
        event_type: impl Into<EventType>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        let event_type = event_type.into();
        let schema_version = event_type.version();

        Self {
            event_id: EventId::new(),
            event_type,
            schema_version,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    /// Creates an envelope from a domain event, serializing it as the payload.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the event cannot be rendered as JSON.
    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize,
    {
        let event_type = EventType::new(event.event_type());
        let payload = serde_json::to_value(event).map_err(|e| {
            DomainError::new(
                ErrorCode::SerializationError,
                format!("Failed to serialize {}: {}", event_type, e),
            )
        })?;

        Ok(Self {
            event_id: event.event_id(),
            schema_version: event.schema_version(),
            event_type,
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload,
            metadata: EventMetadata::default(),
        })
    }

    /// Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    /// Add causation ID (ID of event that caused this one).
    pub fn with_causation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.causation_id = Some(id.into());
        self
    }

    /// Returns true if this envelope's type is `event_type` or one of its subtypes.
    pub fn is_a(&self, event_type: &EventType) -> bool {
        self.event_type.is_a(event_type)
    }

    /// Deserialize payload to a specific event type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct WidgetShipped {
        event_id: EventId,
        widget_id: String,
        occurred_at: Timestamp,
    }

    domain_event!(
        WidgetShipped,
        event_type = "test.widget.shipped.v2",
        schema_version = 2,
        aggregate_id = widget_id,
        aggregate_type = "Widget",
        occurred_at = occurred_at,
        event_id = event_id
    );

    // ============================================================
    // EventId Tests
    // ============================================================

    #[test]
    fn event_id_generates_unique_values() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn event_id_serializes_to_json() {
        let id = EventId::from_string("test-id");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""test-id""#);
    }

    // ============================================================
    // EventType Tests
    // ============================================================

    #[test]
    fn event_type_is_a_itself() {
        let t = EventType::new("user.created.v1");
        assert!(t.is_a(&t));
    }

    #[test]
    fn event_type_is_a_segment_prefix() {
        let t = EventType::new("billing.customer.created.v1");
        assert!(t.is_a(&EventType::new("billing.customer.created")));
        assert!(t.is_a(&EventType::new("billing.customer")));
        assert!(t.is_a(&EventType::new("billing")));
    }

    #[test]
    fn event_type_is_not_a_partial_segment_prefix() {
        let t = EventType::new("billing.customers.created");
        assert!(!t.is_a(&EventType::new("billing.customer")));
    }

    #[test]
    fn supertype_is_not_a_subtype() {
        let parent = EventType::new("billing");
        assert!(!parent.is_a(&EventType::new("billing.customer")));
    }

    #[test]
    fn every_type_is_an_any() {
        assert!(EventType::new("user.created").is_a(&EventType::any()));
        assert!(EventType::any().is_a(&EventType::any()));
    }

    #[test]
    fn parent_walks_up_to_root() {
        let t = EventType::new("billing.customer");
        assert_eq!(t.parent(), Some(EventType::new("billing")));
        assert_eq!(EventType::new("billing").parent(), Some(EventType::any()));
        assert_eq!(EventType::any().parent(), None);
    }

    #[test]
    fn version_is_extracted_from_suffix() {
        assert_eq!(EventType::new("user.created.v2").version(), 2);
        assert_eq!(EventType::new("user.created.v10").version(), 10);
        assert_eq!(EventType::new("legacy.event").version(), 1);
    }

    // ============================================================
    // EventEnvelope Tests
    // ============================================================

    #[test]
    fn envelope_new_extracts_schema_version() {
        let envelope = EventEnvelope::new("test.event.v3", "agg-1", "Test", json!({}));
        assert_eq!(envelope.schema_version, 3);
        assert_eq!(envelope.event_type.as_str(), "test.event.v3");
    }

    #[test]
    fn envelope_from_event_copies_identity_and_payload() {
        let event = WidgetShipped {
            event_id: EventId::from_string("evt-1"),
            widget_id: "widget-9".to_string(),
            occurred_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event).unwrap();

        assert_eq!(envelope.event_id.as_str(), "evt-1");
        assert_eq!(envelope.aggregate_id, "widget-9");
        assert_eq!(envelope.aggregate_type, "Widget");
        assert_eq!(envelope.schema_version, 2);
        assert!(envelope.is_a(&EventType::new("test.widget")));

        let back: WidgetShipped = envelope.payload_as().unwrap();
        assert_eq!(back.widget_id, "widget-9");
    }

    #[test]
    fn envelope_builders_set_metadata() {
        let envelope = EventEnvelope::new("test.event", "agg-1", "Test", json!({}))
            .with_correlation_id("req-1")
            .with_causation_id("evt-0");

        assert_eq!(envelope.metadata.correlation_id.as_deref(), Some("req-1"));
        assert_eq!(envelope.metadata.causation_id.as_deref(), Some("evt-0"));
    }
}
