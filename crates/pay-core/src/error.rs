//! # Payment Error Types
//!
//! Typed error handling for the payments service.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Price mismatch or invalid amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Payment gateway rejected the request
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Message bus publish failed
    #[error("Publish to '{subject}' failed: {reason}")]
    PublishFailed { subject: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true for errors raised while talking to the payment gateway.
    ///
    /// These propagate unchanged out of the session creator.
    pub fn is_gateway_error(&self) -> bool {
        matches!(
            self,
            PaymentError::ProviderError { .. } | PaymentError::NetworkError(_)
        )
    }

    /// Returns true if this error means an inbound webhook could not be trusted
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            PaymentError::WebhookVerificationFailed(_) | PaymentError::WebhookParseError(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InvalidPrice { .. } => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::PublishFailed { .. } => 500,
            PaymentError::Serialization(_) => 500,
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
