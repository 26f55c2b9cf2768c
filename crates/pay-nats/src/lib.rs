//! # pay-nats
//!
//! NATS message bus integration for the payments micro-service.
//!
//! - `NatsClient`: shared, cheaply cloneable connection handle
//! - `NatsPublisher`: `EventPublisher` over core NATS publish (no acknowledgement)
//! - `RequestEnvelope` / `ReplyEnvelope`: wire shapes for message-pattern
//!   requests such as `create.payment.session`
//!
//! Events go out as `{"pattern": <subject>, "data": <payload>}`, the framing
//! the order service's NATS transport expects.

#![forbid(unsafe_code)]

/// Tracing target for NATS connection operations.
pub const TRACING_TARGET_CONNECTION: &str = "pay_nats::connection";

/// Tracing target for publish and request/reply operations.
pub const TRACING_TARGET_CLIENT: &str = "pay_nats::client";

mod client;
mod config;
mod envelope;
mod error;
mod publisher;

pub use client::NatsClient;
pub use config::NatsConfig;
pub use envelope::{EventEnvelope, ReplyEnvelope, ReplyError, RequestEnvelope};
pub use error::{Error, Result};
pub use publisher::NatsPublisher;

// Re-export async_nats types needed by consumers
pub use async_nats::{Message, Subscriber};
