//! Subscription state machine.
//!
//! Defines the three subscription states, their persistence tokens and the
//! transition table driven by the `cancel`, `activate` and `mark_past_due`
//! actions.
//!
//! | Current   | cancel    | activate | mark_past_due |
//! |-----------|-----------|----------|---------------|
//! | Active    | Cancelled | -        | PastDue       |
//! | Cancelled | -         | Active   | error         |
//! | PastDue   | Cancelled | Active   | -             |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::StateMachine;

use super::SubscriptionError;

/// Subscription lifecycle state.
///
/// Serialized as the lowercase status token used for persistence and API
/// exposure (`"active"`, `"cancelled"`, `"pastdue"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    /// Paid up and in good standing.
    Active,

    /// Cancelled by the customer or the payment provider.
    Cancelled,

    /// Latest payment failed; can recover to Active.
    PastDue,
}

/// Trigger applied to a subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionAction {
    Cancel,
    Activate,
    MarkPastDue,
}

impl SubscriptionAction {
    /// Every action, in declaration order.
    pub const ALL: [SubscriptionAction; 3] = [
        SubscriptionAction::Cancel,
        SubscriptionAction::Activate,
        SubscriptionAction::MarkPastDue,
    ];

    /// Name of the action as exposed to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionAction::Cancel => "cancel",
            SubscriptionAction::Activate => "activate",
            SubscriptionAction::MarkPastDue => "mark_past_due",
        }
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SubscriptionState {
    const ACTIVE: &'static str = "active";
    const CANCELLED: &'static str = "cancelled";
    const PAST_DUE: &'static str = "pastdue";

    /// Every state, in declaration order.
    pub const ALL: [SubscriptionState; 3] = [
        SubscriptionState::Active,
        SubscriptionState::Cancelled,
        SubscriptionState::PastDue,
    ];

    /// Encodes the state as its status token.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionState::Active => Self::ACTIVE,
            SubscriptionState::Cancelled => Self::CANCELLED,
            SubscriptionState::PastDue => Self::PAST_DUE,
        }
    }

    /// State after a `cancel`. Never fails.
    pub fn cancel(self) -> Self {
        SubscriptionState::Cancelled
    }

    /// State after an `activate`. Never fails.
    pub fn activate(self) -> Self {
        SubscriptionState::Active
    }

    /// State after a `mark_past_due`.
    ///
    /// # Errors
    ///
    /// A cancelled subscription can never be marked past due.
    pub fn mark_past_due(self) -> Result<Self, SubscriptionError> {
        match self {
            SubscriptionState::Active | SubscriptionState::PastDue => Ok(SubscriptionState::PastDue),
            SubscriptionState::Cancelled => Err(SubscriptionError::IllegalTransition {
                from: self,
                action: SubscriptionAction::MarkPastDue,
            }),
        }
    }

    /// Pure transition function over the whole table.
    pub fn apply(self, action: SubscriptionAction) -> Result<Self, SubscriptionError> {
        match action {
            SubscriptionAction::Cancel => Ok(self.cancel()),
            SubscriptionAction::Activate => Ok(self.activate()),
            SubscriptionAction::MarkPastDue => self.mark_past_due(),
        }
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionState {
    type Err = SubscriptionError;

    /// Decodes a status token. Unknown tokens are a hard error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ACTIVE => Ok(SubscriptionState::Active),
            Self::CANCELLED => Ok(SubscriptionState::Cancelled),
            Self::PAST_DUE => Ok(SubscriptionState::PastDue),
            other => Err(SubscriptionError::UnknownStatus(other.to_string())),
        }
    }
}

impl StateMachine for SubscriptionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionState::*;
        matches!(
            (self, target),
            // No-op transitions
            (Active, Active)
                | (Cancelled, Cancelled)
                | (PastDue, PastDue)
            // From ACTIVE
                | (Active, Cancelled)
                | (Active, PastDue)
            // From CANCELLED
                | (Cancelled, Active)
            // From PAST_DUE
                | (PastDue, Cancelled)
                | (PastDue, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionState::*;
        match self {
            Active => vec![Active, Cancelled, PastDue],
            Cancelled => vec![Cancelled, Active],
            PastDue => vec![PastDue, Cancelled, Active],
        }
    }
}
