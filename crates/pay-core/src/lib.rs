//! # pay-core
//!
//! Core types and traits for the payments micro-service.
//!
//! This crate provides:
//! - `PaymentStrategy` trait for payment gateways (session creation, webhook verification)
//! - `EventPublisher` trait for the message bus
//! - `PaymentSessionRequest`, `OrderLineItem` and `PaymentSessionResult` for checkout
//! - `WebhookEvent` and `PaymentSucceeded` for webhook processing
//! - `Currency` and `to_minor_units` for money handling
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Currency, OrderLineItem, PaymentSessionRequest, PaymentStrategy};
//! use rust_decimal_macros::dec;
//!
//! let request = PaymentSessionRequest::new(Currency::parse("usd")?, "order-123")
//!     .with_item(OrderLineItem::new("Keyboard", dec!(49.99), 1));
//! request.validate()?;
//!
//! let session = strategy.create_session(&request, &urls).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod error;
pub mod event;
pub mod money;
pub mod order;
pub mod publisher;
pub mod strategy;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{PaymentSucceeded, WebhookEvent, WebhookEventType, PAYMENT_SUCCEEDED_SUBJECT};
pub use money::{to_minor_units, Currency};
pub use order::{OrderLineItem, PaymentSessionRequest, PaymentSessionResult};
pub use publisher::{BoxedEventPublisher, EventPublisher};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};

// Callers build line items from exact decimals
pub use rust_decimal::Decimal;
