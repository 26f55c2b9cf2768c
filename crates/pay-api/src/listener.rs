//! # Message-Pattern Listener
//!
//! Serves `create.payment.session` requests arriving over NATS, so other
//! services can open a checkout session without going through HTTP.

use crate::payments::PaymentsService;
use futures::StreamExt;
use pay_core::{PaymentSessionRequest, PaymentSessionResult};
use pay_nats::{Message, NatsClient, ReplyEnvelope, RequestEnvelope};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Request subject for session creation
pub const CREATE_PAYMENT_SESSION_PATTERN: &str = "create.payment.session";

/// Queue group shared by every instance of this service
pub const QUEUE_GROUP: &str = "payments-ms";

/// Turn one raw request payload into its reply
pub async fn answer_request(service: &PaymentsService, payload: &[u8]) -> ReplyEnvelope {
    let envelope: RequestEnvelope<PaymentSessionRequest> = match serde_json::from_slice(payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Malformed {} request: {}", CREATE_PAYMENT_SESSION_PATTERN, e);
            return ReplyEnvelope::error(None, 400, format!("Malformed request: {}", e));
        }
    };

    match service.create_payment_session(&envelope.data).await {
        Ok(session) => session_reply(envelope.id, &session),
        Err(e) => ReplyEnvelope::error(envelope.id, e.status_code(), e.to_string()),
    }
}

fn session_reply(id: Option<String>, session: &PaymentSessionResult) -> ReplyEnvelope {
    match serde_json::to_value(session) {
        Ok(value) => ReplyEnvelope::response(id, value),
        Err(e) => ReplyEnvelope::error(id, 500, e.to_string()),
    }
}

async fn reply(client: &NatsClient, message: Message, service: &PaymentsService) {
    let Some(reply_to) = message.reply.as_ref().map(|s| s.to_string()) else {
        debug!("Ignoring {} without reply subject", CREATE_PAYMENT_SESSION_PATTERN);
        return;
    };

    let envelope = answer_request(service, &message.payload).await;
    match serde_json::to_vec(&envelope) {
        Ok(bytes) => {
            if let Err(e) = client.publish(&reply_to, bytes).await {
                error!("Failed to send reply: {}", e);
            }
        }
        Err(e) => error!("Failed to encode reply: {}", e),
    }
}

/// Serve requests until the subscription closes
pub async fn run(client: NatsClient, service: Arc<PaymentsService>) -> pay_nats::Result<()> {
    let mut subscriber = client
        .queue_subscribe(CREATE_PAYMENT_SESSION_PATTERN, QUEUE_GROUP)
        .await?;

    info!(
        "Listening for {} requests (queue={})",
        CREATE_PAYMENT_SESSION_PATTERN, QUEUE_GROUP
    );

    while let Some(message) = subscriber.next().await {
        let client = client.clone();
        let service = service.clone();
        tokio::spawn(async move {
            reply(&client, message, &service).await;
        });
    }

    warn!("{} subscription closed", CREATE_PAYMENT_SESSION_PATTERN);
    Ok(())
}
