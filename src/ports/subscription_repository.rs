//! Subscription repository port.
//!
//! Persists subscriptions by their status token. State changes go through
//! [`SubscriptionRepository::modify`], which serializes updates to the same
//! subscription so two transitions never interleave.
//!
//! # Example
//!
//! ```ignore
//! let updated = repo.modify(&id, &mut |sub| {
//!     sub.mark_past_due()?;
//!     Ok(())
//! })?;
//! ```

use crate::domain::foundation::{CustomerId, DomainError, SubscriptionId};
use crate::domain::subscription::Subscription;

/// Callback applied to a subscription inside [`SubscriptionRepository::modify`].
pub type SubscriptionUpdate<'a> = dyn FnMut(&mut Subscription) -> Result<(), DomainError> + 'a;

/// Repository port for Subscription persistence.
pub trait SubscriptionRepository: Send + Sync {
    /// Insert or replace a subscription.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by id. Returns `None` if not found.
    fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// All subscriptions owned by a customer, oldest first.
    fn find_by_customer(&self, customer_id: &CustomerId) -> Result<Vec<Subscription>, DomainError>;

    /// Apply `update` to the stored subscription and persist the result.
    ///
    /// Calls for the same id are serialized. If `update` fails nothing is
    /// written and its error is returned.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - whatever `update` returns
    fn modify(
        &self,
        id: &SubscriptionId,
        update: &mut SubscriptionUpdate<'_>,
    ) -> Result<Subscription, DomainError>;
}
