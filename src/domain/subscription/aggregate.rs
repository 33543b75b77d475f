//! Subscription entity.
//!
//! The Subscription owns exactly one [`SubscriptionState`] at a time and is the
//! only place that state is replaced. Callers drive it through `cancel`,
//! `activate` and `mark_past_due`; persistence reads and writes the status
//! token but never sets the state directly.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, SubscriptionId, Timestamp};

use super::{SubscriptionAction, SubscriptionError, SubscriptionState};

/// Outcome of a transition on a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SubscriptionState,
    pub to: SubscriptionState,
}

impl Transition {
    /// Returns true if the state was actually replaced.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// A customer's subscription to a plan.
///
/// # Invariants
///
/// - Exactly one current state
/// - `status()` always reflects the current state
/// - `updated_at` moves only when the state or billing period changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// Customer who owns this subscription.
    pub customer_id: CustomerId,

    /// Plan the customer is subscribed to.
    pub plan_id: String,

    /// End of the current paid period.
    pub expires_at: Timestamp,

    /// Current lifecycle state, persisted as its status token.
    #[serde(rename = "status")]
    state: SubscriptionState,

    /// When the subscription was last changed.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Create a new subscription. New subscriptions start Active.
    pub fn new(
        id: SubscriptionId,
        customer_id: CustomerId,
        plan_id: impl Into<String>,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id,
            customer_id,
            plan_id: plan_id.into(),
            expires_at,
            state: SubscriptionState::Active,
            updated_at: Timestamp::now(),
        }
    }

    /// Rebuild a subscription from persisted fields.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStatus` if the status token is not recognized.
    pub fn restore(
        id: SubscriptionId,
        customer_id: CustomerId,
        plan_id: impl Into<String>,
        expires_at: Timestamp,
        status: &str,
        updated_at: Timestamp,
    ) -> Result<Self, SubscriptionError> {
        Ok(Self {
            id,
            customer_id,
            plan_id: plan_id.into(),
            expires_at,
            state: status.parse()?,
            updated_at,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Status token derived from the current state.
    pub fn status(&self) -> &'static str {
        self.state.as_str()
    }

    /// Returns true once the paid period has ended.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        !self.expires_at.is_after(now)
    }

    /// Cancel the subscription. Idempotent, never fails.
    pub fn cancel(&mut self) -> Transition {
        let next = self.state.cancel();
        self.replace_state(next)
    }

    /// Activate the subscription. Never fails.
    pub fn activate(&mut self) -> Transition {
        let next = self.state.activate();
        self.replace_state(next)
    }

    /// Mark the subscription past due after a failed payment.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` if the subscription is cancelled; the state
    /// is left unchanged.
    pub fn mark_past_due(&mut self) -> Result<Transition, SubscriptionError> {
        let next = self.state.mark_past_due()?;
        Ok(self.replace_state(next))
    }

    /// Apply an action by value.
    ///
    /// # Errors
    ///
    /// Same as the corresponding named method.
    pub fn apply(&mut self, action: SubscriptionAction) -> Result<Transition, SubscriptionError> {
        let next = self.state.apply(action)?;
        Ok(self.replace_state(next))
    }

    /// Activate and move the end of the paid period to `period_end`.
    pub fn renew(&mut self, period_end: Timestamp) -> Transition {
        let transition = self.activate();
        if self.expires_at != period_end {
            self.expires_at = period_end;
            self.updated_at = Timestamp::now();
        }
        transition
    }

    fn replace_state(&mut self, next: SubscriptionState) -> Transition {
        let transition = Transition {
            from: self.state,
            to: next,
        };
        if transition.changed() {
            self.state = next;
            self.updated_at = Timestamp::now();
        }
        transition
    }
}
