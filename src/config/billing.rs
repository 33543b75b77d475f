//! Billing configuration

use serde::Deserialize;

use crate::domain::subscription::BillingTerms;

use super::error::ValidationError;

const MAX_BILLING_PERIOD_DAYS: u32 = 366;

/// Billing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days added to a subscription's expiry when an invoice is paid
    #[serde(default = "default_billing_period_days")]
    pub billing_period_days: u32,

    /// Plan assigned when a payment names none
    #[serde(default = "default_plan_id")]
    pub default_plan_id: String,
}

impl BillingConfig {
    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.billing_period_days == 0 || self.billing_period_days > MAX_BILLING_PERIOD_DAYS {
            return Err(ValidationError::InvalidBillingPeriod(
                self.billing_period_days,
            ));
        }
        if self.default_plan_id.trim().is_empty() {
            return Err(ValidationError::EmptyDefaultPlan);
        }
        Ok(())
    }

    /// Billing terms for the webhook strategies
    pub fn terms(&self) -> BillingTerms {
        BillingTerms::new(self.billing_period_days, self.default_plan_id.clone())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            billing_period_days: default_billing_period_days(),
            default_plan_id: default_plan_id(),
        }
    }
}

fn default_billing_period_days() -> u32 {
    30
}

fn default_plan_id() -> String {
    "basic".to_string()
}
