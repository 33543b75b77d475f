//! Integration tests for the in-process event bus.
//!
//! Covers delivery order across and within subscribed types, subtype
//! matching, fail-fast error propagation, and concurrent publishing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;

use billing_core::adapters::events::{
    publish_event, EventRecorder, FnEventHandler, InMemoryEventBus,
};
use billing_core::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventType, UserId};
use billing_core::domain::user::UserCreated;
use billing_core::ports::{EventHandler, EventPublisher, EventSubscriber};

// =============================================================================
// Test Infrastructure
// =============================================================================

type Log = Arc<Mutex<Vec<String>>>;

fn recording(label: &'static str, log: &Log) -> Arc<dyn EventHandler> {
    let log = Arc::clone(log);
    Arc::new(FnEventHandler::new(label, move |event: EventEnvelope| {
        log.lock()
            .unwrap()
            .push(format!("{}:{}", label, event.event_type));
        Ok(())
    }))
}

fn failing(label: &'static str) -> Arc<dyn EventHandler> {
    Arc::new(FnEventHandler::new(label, move |_| {
        Err(DomainError::new(ErrorCode::HandlerFailed, label))
    }))
}

fn envelope(event_type: &str) -> EventEnvelope {
    EventEnvelope::new(event_type, "agg-1", "Test", json!({}))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn handlers_for_a_fire_in_order_and_b_handler_is_skipped() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::new("a"), recording("h1", &log));
    bus.subscribe(EventType::new("a"), recording("h2", &log));
    bus.subscribe(EventType::new("b"), recording("h3", &log));

    bus.publish(envelope("a")).unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["h1:a", "h2:a"]);
}

#[test]
fn subtype_of_b_reaches_b_handler() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::new("a"), recording("h1", &log));
    bus.subscribe(EventType::new("a"), recording("h2", &log));
    bus.subscribe(EventType::new("b"), recording("h3", &log));

    bus.publish(envelope("b.refined")).unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["h3:b.refined"]);
}

#[test]
fn catch_all_subscription_sees_every_event() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::any(), recording("audit", &log));

    bus.publish(envelope("user.created.v1")).unwrap();
    bus.publish(envelope("billing.customer.created.v1")).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "audit:user.created.v1",
            "audit:billing.customer.created.v1"
        ]
    );
}

#[test]
fn segment_boundaries_are_respected() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::new("user.create"), recording("h", &log));

    bus.publish(envelope("user.created.v1")).unwrap();

    assert!(log.lock().unwrap().is_empty());
}

// =============================================================================
// Fail-fast
// =============================================================================

#[test]
fn first_error_stops_delivery_and_reaches_publisher() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::new("a"), failing("h1"));
    bus.subscribe(EventType::new("a"), recording("h2", &log));

    let err = bus.publish(envelope("a")).unwrap_err();

    assert_eq!(err, DomainError::new(ErrorCode::HandlerFailed, "h1"));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn earlier_handlers_are_not_rolled_back() {
    let bus = InMemoryEventBus::new();
    let log: Log = Arc::default();
    bus.subscribe(EventType::new("a"), recording("h1", &log));
    bus.subscribe(EventType::new("a"), failing("h2"));
    bus.subscribe(EventType::new("a"), recording("h3", &log));

    assert!(bus.publish(envelope("a")).is_err());

    assert_eq!(*log.lock().unwrap(), vec!["h1:a"]);
}

// =============================================================================
// Domain events and concurrency
// =============================================================================

#[test]
fn publish_event_wraps_domain_event() {
    let bus = InMemoryEventBus::new();
    let received: Arc<Mutex<Vec<UserCreated>>> = Arc::default();
    let sink = Arc::clone(&received);
    bus.subscribe(
        EventType::new("user"),
        Arc::new(FnEventHandler::new("Sink", move |event: EventEnvelope| {
            let user: UserCreated = event
                .payload_as()
                .map_err(|e| DomainError::new(ErrorCode::SerializationError, e.to_string()))?;
            sink.lock().unwrap().push(user);
            Ok(())
        })),
    );
    let user = UserCreated::new(UserId::new(), "ada@example.com");

    publish_event(&bus, &user).unwrap();

    assert_eq!(*received.lock().unwrap(), vec![user]);
}

#[test]
fn concurrent_publish_and_subscribe_do_not_lose_deliveries() {
    let bus = Arc::new(InMemoryEventBus::new());
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    bus.subscribe(
        EventType::new("tick"),
        Arc::new(FnEventHandler::new("Counter", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })),
    );
    let recorder = EventRecorder::attach(bus.as_ref());

    let publishers: Vec<_> = (0..4)
        .map(|_| {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for _ in 0..25 {
                    bus.publish(envelope("tick")).unwrap();
                }
            })
        })
        .collect();
    let subscriber = {
        let bus = Arc::clone(&bus);
        thread::spawn(move || {
            for _ in 0..10 {
                bus.subscribe(
                    EventType::new("other"),
                    Arc::new(FnEventHandler::new("Noop", |_| Ok(()))),
                );
            }
        })
    };

    for handle in publishers {
        handle.join().unwrap();
    }
    subscriber.join().unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 100);
    assert_eq!(bus.handler_count(), 12);
    assert_eq!(recorder.event_count(), 100);
}
