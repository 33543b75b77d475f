//! Customer repository port.
//!
//! Billing customers are created when a user signs up and are linked to
//! the payment provider through `stripe_customer_id`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, DomainError};

/// A billing customer as stored by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub email: String,
    pub display_name: Option<String>,
    /// Customer id at the payment provider (`cus_xxx`), once linked.
    pub stripe_customer_id: Option<String>,
}

impl CustomerRecord {
    /// Create an unlinked customer.
    pub fn new(id: CustomerId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            stripe_customer_id: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_stripe_customer_id(mut self, stripe_id: impl Into<String>) -> Self {
        self.stripe_customer_id = Some(stripe_id.into());
        self
    }
}

/// Repository port for billing customers.
pub trait CustomerRepository: Send + Sync {
    /// Insert or replace a customer.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    fn save(&self, customer: &CustomerRecord) -> Result<(), DomainError>;

    /// Insert a customer only if no customer with its id exists.
    ///
    /// The check and the write are a single atomic step.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the id is taken; the stored record is untouched
    /// - `DatabaseError` on persistence failure
    fn insert(&self, customer: &CustomerRecord) -> Result<(), DomainError>;

    /// Find a customer by id. Returns `None` if not found.
    fn find_by_id(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, DomainError>;

    /// Find the customer linked to a payment provider customer id.
    fn find_by_stripe_customer_id(
        &self,
        stripe_customer_id: &str,
    ) -> Result<Option<CustomerRecord>, DomainError>;

    /// Returns true if a customer with this id exists.
    fn exists(&self, id: &CustomerId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id)?.is_some())
    }
}
