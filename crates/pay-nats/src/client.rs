//! NATS client wrapper and connection management.
//!
//! The underlying `async_nats::Client` multiplexes every operation over a
//! single TCP connection and is cheap to clone, so one `NatsClient` is built
//! at start-up and shared by every request.

use std::time::Duration;

use async_nats::{Client, ConnectOptions, Subscriber};
use bytes::Bytes;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::config::NatsConfig;
use crate::{Error, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// NATS client wrapper with connection management.
#[derive(Debug, Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Create a new NATS client and connect
    #[instrument(skip(config), target = TRACING_TARGET_CONNECTION)]
    pub async fn connect(config: &NatsConfig) -> Result<Self> {
        info!(
            target: TRACING_TARGET_CONNECTION,
            servers = %config.server_list(),
            "Connecting to NATS"
        );

        let connect_timeout = config.connect_timeout();
        let options = ConnectOptions::new()
            .name(config.name())
            .connection_timeout(connect_timeout)
            .reconnect_delay_callback(|attempts| {
                Duration::from_millis(std::cmp::min(
                    500 * 2_u64.pow(attempts.min(16) as u32),
                    30_000,
                ))
            });

        let client = timeout(
            connect_timeout,
            async_nats::connect_with_options(config.server_list().as_str(), options),
        )
        .await
        .map_err(|_| Error::Timeout {
            timeout: connect_timeout,
        })?
        .map_err(|e| Error::Connection(Box::new(e)))?;

        let server_info = client.server_info();
        info!(
            target: TRACING_TARGET_CONNECTION,
            server_host = %server_info.host,
            server_version = %server_info.version,
            "Successfully connected to NATS"
        );

        Ok(Self { client })
    }

    /// Publish a message without waiting for delivery
    #[instrument(skip(self, payload), target = TRACING_TARGET_CLIENT)]
    pub async fn publish(&self, subject: &str, payload: impl Into<Bytes>) -> Result<()> {
        let payload = payload.into();
        let payload_size = payload.len();

        self.client
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| Error::delivery_failed(subject, e.to_string()))?;

        debug!(
            target: TRACING_TARGET_CLIENT,
            subject = %subject,
            payload_size = payload_size,
            "Published message"
        );
        Ok(())
    }

    /// Subscribe to a subject with a queue group
    #[instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn queue_subscribe(&self, subject: &str, queue: &str) -> Result<Subscriber> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue.to_string())
            .await
            .map_err(|e| Error::Connection(Box::new(e)))?;

        debug!(
            target: TRACING_TARGET_CLIENT,
            subject = %subject,
            queue = %queue,
            "Subscribed to subject with queue group"
        );
        Ok(subscriber)
    }

    /// Flush buffered messages, used on shutdown
    #[instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn flush(&self) -> Result<()> {
        let flush_timeout = Duration::from_secs(5);
        timeout(flush_timeout, self.client.flush())
            .await
            .map_err(|_| Error::Timeout {
                timeout: flush_timeout,
            })?
            .map_err(|e| Error::Connection(Box::new(e)))?;
        Ok(())
    }
}
