//! # pay-api
//!
//! HTTP and messaging surface of the payments micro-service.
//!
//! This crate provides:
//! - `PaymentsService`: session creation and webhook processing
//! - Axum-based HTTP server
//! - NATS listener for `create.payment.session` requests
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payments/create-payment-session` | Create checkout session |
//! | GET | `/payments/success` | Landing after payment |
//! | GET | `/payments/cancel` | Landing after cancellation |
//! | POST | `/payments/webhook` | Stripe webhook |

pub mod handlers;
pub mod listener;
pub mod payments;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use payments::{PaymentsService, WebhookResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
