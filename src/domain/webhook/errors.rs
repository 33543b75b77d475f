//! Webhook error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that occur while routing or handling a webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No strategy accepted the event type.
    ///
    /// Only possible when the strategy list has no catch-all, which is a
    /// configuration defect rather than a bad event.
    #[error("No webhook handler found for event type '{0}'")]
    NoHandlerFound(String),

    /// Failed to parse the webhook payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The selected strategy failed.
    #[error("Webhook handler failed: {0}")]
    Handler(#[from] DomainError),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    ///
    /// Parse errors and missing handlers will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookError::Handler(err) => matches!(
                err.code,
                ErrorCode::DatabaseError | ErrorCode::InternalError
            ),
            WebhookError::NoHandlerFound(_) | WebhookError::Parse(_) => false,
        }
    }
}

impl From<WebhookError> for DomainError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::NoHandlerFound(event_type) => DomainError::new(
                ErrorCode::NoHandlerFound,
                format!("No webhook handler found for event type '{}'", event_type),
            )
            .with_detail("event_type", event_type),
            WebhookError::Parse(message) => DomainError::new(ErrorCode::InvalidFormat, message),
            WebhookError::Handler(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_handler_found_displays_event_type() {
        let err = WebhookError::NoHandlerFound("foo.bar".to_string());
        assert_eq!(
            err.to_string(),
            "No webhook handler found for event type 'foo.bar'"
        );
    }

    #[test]
    fn database_failures_are_retryable() {
        let err = WebhookError::Handler(DomainError::database("connection reset"));
        assert!(err.is_retryable());
    }

    #[test]
    fn parse_errors_are_not_retryable() {
        assert!(!WebhookError::Parse("bad".to_string()).is_retryable());
        assert!(!WebhookError::NoHandlerFound("x".to_string()).is_retryable());
    }

    #[test]
    fn handler_error_converts_back_unchanged() {
        let inner = DomainError::new(ErrorCode::CustomerNotFound, "gone");
        let err: DomainError = WebhookError::Handler(inner.clone()).into();
        assert_eq!(err, inner);
    }

    #[test]
    fn no_handler_found_maps_to_its_code() {
        let err: DomainError = WebhookError::NoHandlerFound("x".to_string()).into();
        assert_eq!(err.code, ErrorCode::NoHandlerFound);
    }
}
