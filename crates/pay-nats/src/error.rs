//! Error types for NATS operations.

use std::time::Duration;

/// Result type for all NATS operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for NATS operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Invalid NATS configuration: {0}")]
    InvalidConfig(String),

    /// NATS client/connection errors
    #[error("NATS connection error: {0}")]
    Connection(#[source] async_nats::Error),

    /// Serialization errors when sending or receiving messages
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation timeout
    #[error("Operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Message delivery failed
    #[error("Message delivery failed to subject '{subject}': {reason}")]
    DeliveryFailed { subject: String, reason: String },
}

impl Error {
    /// Create a delivery failure for `subject`
    pub fn delivery_failed(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl From<Error> for pay_core::PaymentError {
    fn from(err: Error) -> Self {
        match err {
            Error::DeliveryFailed { subject, reason } => {
                pay_core::PaymentError::PublishFailed { subject, reason }
            }
            Error::Serialization(e) => pay_core::PaymentError::Serialization(e.to_string()),
            other => pay_core::PaymentError::PublishFailed {
                subject: String::new(),
                reason: other.to_string(),
            },
        }
    }
}
