//! In-memory subscription repository.
//!
//! Each subscription lives in its own `Mutex`, so `modify` calls on the same
//! subscription run one at a time while different subscriptions proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::subscription::Subscription;
use crate::ports::{SubscriptionRepository, SubscriptionUpdate};

type Slot = Arc<Mutex<Subscription>>;

#[derive(Default)]
struct Slots {
    by_id: HashMap<SubscriptionId, Slot>,
    // Insertion order, for stable listing.
    order: Vec<SubscriptionId>,
}

/// Subscription repository backed by per-subscription mutexes.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    slots: RwLock<Slots>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &SubscriptionId) -> Option<Slot> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .get(id)
            .cloned()
    }
}

fn not_found(id: &SubscriptionId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("Subscription {} not found", id),
    )
    .with_detail("subscription_id", id.to_string())
}

impl SubscriptionRepository for InMemorySubscriptionRepository {
    fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        if let Some(slot) = self.slot(&subscription.id) {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = subscription.clone();
            return Ok(());
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.by_id.get(&subscription.id) {
            // Inserted by another thread since the read above.
            Some(slot) => {
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = subscription.clone();
            }
            None => {
                slots.by_id.insert(
                    subscription.id,
                    Arc::new(Mutex::new(subscription.clone())),
                );
                slots.order.push(subscription.id);
            }
        }
        Ok(())
    }

    fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .slot(id)
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone()))
    }

    fn find_by_customer(&self, customer_id: &CustomerId) -> Result<Vec<Subscription>, DomainError> {
        let slots: Vec<Slot> = {
            let guard = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            guard
                .order
                .iter()
                .filter_map(|id| guard.by_id.get(id).cloned())
                .collect()
        };

        Ok(slots
            .iter()
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .filter(|sub| sub.customer_id == *customer_id)
            .collect())
    }

    fn modify(
        &self,
        id: &SubscriptionId,
        update: &mut SubscriptionUpdate<'_>,
    ) -> Result<Subscription, DomainError> {
        let slot = self.slot(id).ok_or_else(|| not_found(id))?;
        let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);

        let mut working = current.clone();
        update(&mut working)?;
        *current = working.clone();

        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::subscription::SubscriptionState;
    use std::thread;

    fn subscription_for(customer_id: CustomerId) -> Subscription {
        Subscription::new(
            SubscriptionId::new(),
            customer_id,
            "basic",
            Timestamp::now().add_days(30),
        )
    }

    #[test]
    fn save_then_find_by_id() {
        let repo = InMemorySubscriptionRepository::new();
        let sub = subscription_for(CustomerId::new());

        repo.save(&sub).unwrap();

        assert_eq!(repo.find_by_id(&sub.id).unwrap(), Some(sub));
    }

    #[test]
    fn find_by_customer_returns_only_theirs_in_insertion_order() {
        let repo = InMemorySubscriptionRepository::new();
        let customer = CustomerId::new();
        let first = subscription_for(customer);
        let other = subscription_for(CustomerId::new());
        let second = subscription_for(customer);

        repo.save(&first).unwrap();
        repo.save(&other).unwrap();
        repo.save(&second).unwrap();

        let ids: Vec<_> = repo
            .find_by_customer(&customer)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn modify_applies_and_persists() {
        let repo = InMemorySubscriptionRepository::new();
        let sub = subscription_for(CustomerId::new());
        repo.save(&sub).unwrap();

        let updated = repo
            .modify(&sub.id, &mut |s: &mut Subscription| {
                s.cancel();
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.state(), SubscriptionState::Cancelled);
        assert_eq!(
            repo.find_by_id(&sub.id).unwrap().unwrap().state(),
            SubscriptionState::Cancelled
        );
    }

    #[test]
    fn failed_modify_writes_nothing() {
        let repo = InMemorySubscriptionRepository::new();
        let mut sub = subscription_for(CustomerId::new());
        sub.cancel();
        repo.save(&sub).unwrap();

        let result = repo.modify(&sub.id, &mut |s: &mut Subscription| {
            s.activate();
            s.mark_past_due()?;
            Err(DomainError::new(ErrorCode::InternalError, "abort"))
        });

        assert!(result.is_err());
        assert_eq!(
            repo.find_by_id(&sub.id).unwrap().unwrap().state(),
            SubscriptionState::Cancelled
        );
    }

    #[test]
    fn modify_unknown_subscription_is_not_found() {
        let repo = InMemorySubscriptionRepository::new();

        let err = repo
            .modify(&SubscriptionId::new(), &mut |_: &mut Subscription| Ok(()))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
    }

    #[test]
    fn concurrent_modifications_are_serialized() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let sub = subscription_for(CustomerId::new());
        repo.save(&sub).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let id = sub.id;
                thread::spawn(move || {
                    repo.modify(&id, &mut |s: &mut Subscription| {
                        if i % 2 == 0 {
                            s.cancel();
                        } else {
                            s.activate();
                        }
                        s.plan_id = format!("{}-{}", s.plan_id, i);
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = repo.find_by_id(&sub.id).unwrap().unwrap();
        // Every update saw the previous one's plan suffix.
        assert_eq!(stored.plan_id.matches('-').count(), 8);
    }
}
