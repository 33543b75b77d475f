//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Persistence Ports
//!
//! - `CustomerRepository` - Billing customers
//! - `SubscriptionRepository` - Subscriptions, with serialized updates
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Customer creation at the payment provider

mod customer_repository;
mod event_publisher;
mod event_subscriber;
mod payment_gateway;
mod subscription_repository;

pub use customer_repository::{CustomerRecord, CustomerRepository};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use payment_gateway::{
    CreateCustomerRequest, PaymentError, PaymentErrorCode, PaymentGateway, ProviderCustomer,
};
pub use subscription_repository::{SubscriptionRepository, SubscriptionUpdate};
