//! # pay-stripe
//!
//! Stripe payment gateway for the payments micro-service.
//!
//! **StripeCheckoutStrategy** implements `PaymentStrategy` on top of the
//! Checkout Sessions API:
//! - Dynamic line items priced in the smallest currency unit
//! - Order id attached as payment intent metadata
//! - `Stripe-Signature` webhook verification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeCheckoutStrategy;
//! use pay_core::PaymentStrategy;
//!
//! let strategy = StripeCheckoutStrategy::from_env()?;
//! let urls = strategy.config().checkout_urls();
//!
//! let session = strategy.create_session(&request, &urls).await?;
//!
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_stripe::{dispatch_webhook_event, ChargeSucceededData, WebhookHandler};
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl WebhookHandler for MyHandler {
//!     async fn on_charge_succeeded(&self, data: ChargeSucceededData) -> PaymentResult<()> {
//!         println!("Order {} paid!", data.order_id);
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint:
//! let event = strategy.verify_webhook(payload, signature, secret).await?;
//! dispatch_webhook_event(&MyHandler, &event).await?;
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
pub use webhook::{
    dispatch_webhook_event, sign_payload, verify_stripe_signature, ChargeSucceededData,
    WebhookHandler, SIGNATURE_HEADER,
};
