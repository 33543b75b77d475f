//! Payment gateway port.
//!
//! Creates customers at the external payment provider (e.g. Stripe). The
//! returned provider id is what incoming webhooks reference, so a billing
//! customer is only reachable from webhooks once it has been linked.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Port for payment provider integrations.
///
/// Implementations must treat `idempotency_key` as the provider does:
/// repeating a request with the same key returns the customer created by
/// the first one.
pub trait PaymentGateway: Send + Sync {
    /// Create a customer in the payment system.
    fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<ProviderCustomer, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Internal user id (stored as provider metadata).
    pub user_id: UserId,
    pub email: String,
    pub name: Option<String>,
    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

impl CreateCustomerRequest {
    /// Request keyed by the user id, so redelivered sign-ups reuse the
    /// provider customer.
    pub fn for_user(user_id: UserId, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            name,
            idempotency_key: Some(format!("customer-{}", user_id)),
        }
    }
}

/// Customer as known to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCustomer {
    /// Provider's customer id (`cus_xxx`).
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Payment provider error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    NetworkError,
    AuthenticationError,
    RateLimitExceeded,
    InvalidRequest,
    ProviderError,
}

impl PaymentErrorCode {
    /// Returns true if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError
        )
    }
}

impl fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

/// Error returned by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.to_string()).with_detail("payment_error", err.code.to_string())
    }
}
