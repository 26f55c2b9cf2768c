//! `EventPublisher` implementation over core NATS.

use async_trait::async_trait;
use pay_core::{EventPublisher, PaymentResult};
use tracing::instrument;

use crate::client::NatsClient;
use crate::envelope::EventEnvelope;
use crate::TRACING_TARGET_CLIENT;

/// Publishes service events on NATS.
///
/// Core NATS publish only buffers the message on the connection, so `emit`
/// returns as soon as the message is queued.
#[derive(Debug, Clone)]
pub struct NatsPublisher {
    client: NatsClient,
}

impl NatsPublisher {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }

    /// Encode an event the way subscribers on the bus read it
    pub fn encode(subject: &str, payload: serde_json::Value) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(&EventEnvelope::new(subject, payload))?)
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    #[instrument(skip(self, payload), target = TRACING_TARGET_CLIENT)]
    async fn emit(&self, subject: &str, payload: serde_json::Value) -> PaymentResult<()> {
        let bytes = Self::encode(subject, payload)?;
        self.client.publish(subject, bytes).await?;
        Ok(())
    }
}
