//! # Event Publisher Trait
//!
//! Capability trait for the message bus. Publishing is fire-and-forget:
//! implementations hand the message to the bus client and return without
//! waiting for any acknowledgement.

use crate::error::PaymentResult;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Something that can publish a message on a subject
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` on `subject`
    async fn emit(&self, subject: &str, payload: serde_json::Value) -> PaymentResult<()>;
}

impl dyn EventPublisher {
    /// Serialize `message` and publish it on `subject`
    pub async fn emit_json<T: Serialize + ?Sized + Sync>(
        &self,
        subject: &str,
        message: &T,
    ) -> PaymentResult<()> {
        let payload = serde_json::to_value(message)?;
        self.emit(subject, payload).await
    }
}

/// Type alias for a shared publisher handle
pub type BoxedEventPublisher = Arc<dyn EventPublisher>;
