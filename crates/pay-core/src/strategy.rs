//! # Payment Strategy Trait
//!
//! Capability trait for payment gateways.
//!
//! The service never reaches for a global gateway client. It is handed an
//! `Arc<dyn PaymentStrategy>` at start-up, which lets tests substitute an
//! in-process fake without network access.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_session()                                       │
//! │  ├── verify_webhook()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │StripeCheckout │   │  test fakes   │
//!          │   Strategy    │   │               │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use crate::order::{PaymentSessionRequest, PaymentSessionResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment gateway implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted, single-payment checkout session.
    ///
    /// # Arguments
    /// * `request` - Currency, line items and order id
    /// * `urls` - Redirect URLs after payment or cancellation
    ///
    /// # Returns
    /// The gateway's cancel, success and checkout URLs. Gateway failures are
    /// returned as-is; nothing is retried.
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<PaymentSessionResult>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes, exactly as received
    /// * `signature` - Signature header from the request
    /// * `secret` - Endpoint signing secret
    ///
    /// # Returns
    /// A parsed `WebhookEvent` if signature is valid.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect URLs attached to every checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Where the customer lands after paying
    pub success_url: String,
    /// Where the customer lands after cancelling
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}
