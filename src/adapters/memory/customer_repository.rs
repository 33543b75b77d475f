//! In-memory customer repository.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::{CustomerRecord, CustomerRepository};

/// Customer repository backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<CustomerId, CustomerRecord>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub fn len(&self) -> usize {
        self.customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn save(&self, customer: &CustomerRecord) -> Result<(), DomainError> {
        self.customers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(customer.id, customer.clone());
        Ok(())
    }

    fn insert(&self, customer: &CustomerRecord) -> Result<(), DomainError> {
        let mut customers = self
            .customers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match customers.entry(customer.id) {
            Entry::Occupied(_) => Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Customer {} already exists", customer.id),
            )
            .with_detail("customer_id", customer.id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(customer.clone());
                Ok(())
            }
        }
    }

    fn find_by_id(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, DomainError> {
        Ok(self
            .customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn find_by_stripe_customer_id(
        &self,
        stripe_customer_id: &str,
    ) -> Result<Option<CustomerRecord>, DomainError> {
        Ok(self
            .customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|c| c.stripe_customer_id.as_deref() == Some(stripe_customer_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn find_returns_none_for_unknown_customer() {
        let repo = InMemoryCustomerRepository::new();
        assert!(repo.find_by_id(&CustomerId::new()).unwrap().is_none());
        assert!(!repo.exists(&CustomerId::new()).unwrap());
    }

    #[test]
    fn save_then_find() {
        let repo = InMemoryCustomerRepository::new();
        let record = CustomerRecord::new(CustomerId::new(), "ada@example.com");

        repo.save(&record).unwrap();

        assert_eq!(repo.find_by_id(&record.id).unwrap(), Some(record.clone()));
        assert!(repo.exists(&record.id).unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn save_replaces_existing_record() {
        let repo = InMemoryCustomerRepository::new();
        let record = CustomerRecord::new(CustomerId::new(), "ada@example.com");
        repo.save(&record).unwrap();

        repo.save(&record.clone().with_stripe_customer_id("cus_1"))
            .unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.find_by_stripe_customer_id("cus_1").unwrap().is_some());
    }

    #[test]
    fn find_by_stripe_customer_id_ignores_unlinked() {
        let repo = InMemoryCustomerRepository::new();
        repo.save(&CustomerRecord::new(CustomerId::new(), "a@example.com"))
            .unwrap();

        assert!(repo.find_by_stripe_customer_id("cus_1").unwrap().is_none());
    }

    #[test]
    fn insert_rejects_taken_id_and_keeps_record() {
        let repo = InMemoryCustomerRepository::new();
        let record = CustomerRecord::new(CustomerId::new(), "ada@example.com");
        repo.insert(&record).unwrap();

        let err = repo
            .insert(&CustomerRecord::new(record.id, "other@example.com"))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(
            repo.find_by_id(&record.id).unwrap().unwrap().email,
            "ada@example.com"
        );
    }

    #[test]
    fn concurrent_inserts_of_same_id_have_one_winner() {
        let repo = Arc::new(InMemoryCustomerRepository::new());
        let id = CustomerId::new();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    repo.insert(&CustomerRecord::new(id, format!("u{}@example.com", i)))
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(repo.len(), 1);
    }
}
