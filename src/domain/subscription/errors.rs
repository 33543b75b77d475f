//! Subscription error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::{SubscriptionAction, SubscriptionState};

/// Errors raised by the subscription lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The action is not allowed from the current state.
    ///
    /// Only `mark_past_due` on a cancelled subscription produces this.
    #[error("Illegal transition: cannot {action} a subscription that is {from}")]
    IllegalTransition {
        from: SubscriptionState,
        action: SubscriptionAction,
    },

    /// A persisted status token did not match any known state.
    #[error("Unknown subscription status: '{0}'")]
    UnknownStatus(String),
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        match &err {
            SubscriptionError::IllegalTransition { from, action } => {
                DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
                    .with_detail("from", from.as_str())
                    .with_detail("action", action.as_str())
            }
            SubscriptionError::UnknownStatus(token) => {
                DomainError::new(ErrorCode::InvalidFormat, err.to_string())
                    .with_detail("status", token.clone())
            }
        }
    }
}
