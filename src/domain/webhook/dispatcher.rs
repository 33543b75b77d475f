//! Webhook dispatcher - routes an event type to exactly one strategy.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::subscription::BillingTerms;
use crate::ports::{CustomerRepository, EventPublisher, SubscriptionRepository};

use super::{
    DefaultStrategy, InvoicePaidStrategy, SubscriptionDeletedStrategy, WebhookError, WebhookEvent,
    WebhookStrategy,
};

/// Event type no real provider sends, used to check for a catch-all.
const UNROUTABLE_EVENT_TYPE: &str = "__billing_core__.unroutable";

/// Ordered list of strategies. The first strategy that supports an event
/// type handles it.
pub struct WebhookDispatcher {
    strategies: Vec<Box<dyn WebhookStrategy>>,
}

impl WebhookDispatcher {
    /// Create a dispatcher over any ordered list of strategies.
    pub fn new(strategies: Vec<Box<dyn WebhookStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard configuration: invoice paid, subscription deleted, then
    /// the catch-all.
    pub fn standard(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        events: Arc<dyn EventPublisher>,
        terms: BillingTerms,
    ) -> Self {
        Self::new(vec![
            Box::new(InvoicePaidStrategy::new(
                Arc::clone(&customers),
                Arc::clone(&subscriptions),
                Arc::clone(&events),
                terms,
            )),
            Box::new(SubscriptionDeletedStrategy::new(
                customers,
                subscriptions,
                events,
            )),
            Box::new(DefaultStrategy),
        ])
    }

    /// Find the strategy for an event type.
    ///
    /// # Errors
    ///
    /// Returns `NoHandlerFound` if no strategy supports the type.
    pub fn resolve(&self, event_type: &str) -> Result<&dyn WebhookStrategy, WebhookError> {
        match self.strategies.iter().find(|s| s.supports(event_type)) {
            Some(strategy) => {
                debug!(event_type, strategy = strategy.name(), "Resolved webhook strategy");
                Ok(strategy.as_ref())
            }
            None => {
                warn!(event_type, "No webhook strategy supports event type");
                Err(WebhookError::NoHandlerFound(event_type.to_string()))
            }
        }
    }

    /// Resolve and run the strategy for an event.
    ///
    /// Returns the name of the strategy that handled it. Strategy errors are
    /// returned unchanged.
    pub fn dispatch(&self, event: &WebhookEvent) -> Result<&'static str, WebhookError> {
        let strategy = self.resolve(&event.event_type)?;
        strategy.handle(&event.data)?;
        Ok(strategy.name())
    }

    /// Returns true if the last strategy accepts any event type.
    pub fn has_catch_all(&self) -> bool {
        self.strategies
            .last()
            .map(|s| s.supports(UNROUTABLE_EVENT_TYPE))
            .unwrap_or(false)
    }

    /// Strategy names in routing order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{InMemoryCustomerRepository, InMemorySubscriptionRepository};
    use crate::domain::foundation::{DomainError, ErrorCode};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn standard() -> WebhookDispatcher {
        WebhookDispatcher::standard(
            Arc::new(InMemoryCustomerRepository::new()),
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(InMemoryEventBus::new()),
            BillingTerms::default(),
        )
    }

    struct Prefix {
        prefix: &'static str,
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl WebhookStrategy for Prefix {
        fn supports(&self, event_type: &str) -> bool {
            event_type.starts_with(self.prefix)
        }

        fn handle(&self, _data: &Value) -> Result<(), WebhookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    struct Failing;

    impl WebhookStrategy for Failing {
        fn supports(&self, _event_type: &str) -> bool {
            true
        }

        fn handle(&self, _data: &Value) -> Result<(), WebhookError> {
            Err(DomainError::new(ErrorCode::InternalError, "nope").into())
        }

        fn name(&self) -> &'static str {
            "Failing"
        }
    }

    #[test]
    fn resolves_invoice_paid() {
        let dispatcher = standard();
        assert_eq!(
            dispatcher.resolve("invoice.paid").unwrap().name(),
            "InvoicePaidStrategy"
        );
    }

    #[test]
    fn resolves_subscription_deleted() {
        let dispatcher = standard();
        assert_eq!(
            dispatcher
                .resolve("customer.subscription.deleted")
                .unwrap()
                .name(),
            "SubscriptionDeletedStrategy"
        );
    }

    #[test]
    fn unknown_type_falls_through_to_default() {
        let dispatcher = standard();
        assert_eq!(
            dispatcher.resolve("unknown.event.type").unwrap().name(),
            "DefaultStrategy"
        );
    }

    #[test]
    fn first_match_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let dispatcher = WebhookDispatcher::new(vec![
            Box::new(Prefix {
                prefix: "invoice.",
                name: "First",
                calls: first.clone(),
            }),
            Box::new(Prefix {
                prefix: "invoice.paid",
                name: "Second",
                calls: second.clone(),
            }),
        ]);

        let event = WebhookEvent {
            id: "evt_1".to_string(),
            event_type: "invoice.paid".to_string(),
            data: json!({}),
        };

        assert_eq!(dispatcher.dispatch(&event).unwrap(), "First");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_catch_all_yields_no_handler_found() {
        let dispatcher = WebhookDispatcher::new(vec![Box::new(Prefix {
            prefix: "invoice.",
            name: "Invoices",
            calls: Arc::new(AtomicUsize::new(0)),
        })]);

        let result = dispatcher.resolve("charge.refunded");

        assert!(matches!(
            result,
            Err(WebhookError::NoHandlerFound(ref t)) if t == "charge.refunded"
        ));
        assert!(!dispatcher.has_catch_all());
    }

    #[test]
    fn empty_dispatcher_has_no_catch_all() {
        let dispatcher = WebhookDispatcher::new(Vec::new());
        assert!(!dispatcher.has_catch_all());
        assert!(dispatcher.resolve("invoice.paid").is_err());
    }

    #[test]
    fn standard_dispatcher_has_catch_all() {
        assert!(standard().has_catch_all());
        assert_eq!(
            standard().strategy_names(),
            vec![
                "InvoicePaidStrategy",
                "SubscriptionDeletedStrategy",
                "DefaultStrategy"
            ]
        );
    }

    #[test]
    fn handler_errors_propagate_unchanged() {
        let dispatcher = WebhookDispatcher::new(vec![Box::new(Failing)]);
        let event = WebhookEvent {
            id: "evt_2".to_string(),
            event_type: "anything".to_string(),
            data: json!({}),
        };

        let err = dispatcher.dispatch(&event).unwrap_err();

        assert_eq!(
            err,
            WebhookError::Handler(DomainError::new(ErrorCode::InternalError, "nope"))
        );
    }
}
