//! In-memory payment gateway.
//!
//! Issues `cus_` ids locally, honours idempotency keys and can be told to
//! fail the next call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::ports::{CreateCustomerRequest, PaymentError, PaymentGateway, ProviderCustomer};

#[derive(Debug, Default)]
struct GatewayState {
    /// Customers by idempotency key, or by generated id when no key was sent.
    customers: HashMap<String, ProviderCustomer>,
    next_error: Option<PaymentError>,
    calls: usize,
}

/// Payment gateway that keeps customers in memory.
#[derive(Debug, Default)]
pub struct InMemoryPaymentGateway {
    state: Mutex<GatewayState>,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next call return `error`.
    pub fn fail_next(&self, error: PaymentError) {
        self.lock().next_error = Some(error);
    }

    /// Number of distinct customers created.
    pub fn customer_count(&self) -> usize {
        self.lock().customers.len()
    }

    /// Number of `create_customer` calls, including failed and repeated ones.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }
}

impl PaymentGateway for InMemoryPaymentGateway {
    fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<ProviderCustomer, PaymentError> {
        let mut state = self.lock();
        state.calls += 1;
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let id = format!("cus_{}", Uuid::new_v4().simple());
        let key = request.idempotency_key.clone().unwrap_or_else(|| id.clone());
        let customer = state
            .customers
            .entry(key)
            .or_insert_with(|| ProviderCustomer {
                id,
                email: request.email,
                name: request.name,
            })
            .clone();

        debug!(user_id = %request.user_id, provider_customer_id = %customer.id, "Provider customer ready");
        Ok(customer)
    }
}
