//! In-memory adapters for tests and local wiring.

mod customer_repository;
mod payment_gateway;
mod subscription_repository;

pub use customer_repository::InMemoryCustomerRepository;
pub use payment_gateway::InMemoryPaymentGateway;
pub use subscription_repository::InMemorySubscriptionRepository;
