//! Billing terms applied when a subscription is paid for.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp};

/// Length of a paid period and the plan used when none is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingTerms {
    pub period_days: u32,
    pub default_plan_id: String,
}

impl BillingTerms {
    pub fn new(period_days: u32, default_plan_id: impl Into<String>) -> Self {
        Self {
            period_days,
            default_plan_id: default_plan_id.into(),
        }
    }

    /// End of a period starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if the period runs past the representable
    /// date range.
    pub fn period_end_from(&self, start: Timestamp) -> Result<Timestamp, DomainError> {
        start
            .checked_add_days(i64::from(self.period_days))
            .ok_or_else(|| {
                DomainError::validation(
                    "period_days",
                    format!("Billing period of {} days is out of range", self.period_days),
                )
            })
    }
}

impl Default for BillingTerms {
    fn default() -> Self {
        Self::new(30, "basic")
    }
}
