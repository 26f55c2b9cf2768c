//! # Stripe Webhook Handling
//!
//! Signature verification, event parsing and dispatch for Stripe webhooks.
//!
//! Stripe signs `"{timestamp}.{raw body}"` with HMAC-SHA256 using the
//! endpoint secret and sends the result in the `Stripe-Signature` header as
//! `t=<unix>,v1=<hex>[,v1=<hex>...]`. Verification runs over the raw body
//! bytes exactly as received.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use pay_core::{
    PaymentError, PaymentResult, PaymentSucceeded, WebhookEvent, WebhookEventType,
};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age of a signed payload, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

// =============================================================================
// Signature Verification
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = value.parse().ok();
            }
            "v1" => {
                // Undecodable candidates can never match, skip them
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed(
            "Unable to extract timestamp and signatures from header".to_string(),
        )
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Configuration(format!("Invalid endpoint secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verify a `Stripe-Signature` header against the raw payload.
///
/// `now` is the current unix time; the signed timestamp must be no older
/// than `tolerance_secs`. Signature comparison is constant-time.
pub fn verify_stripe_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> PaymentResult<()> {
    let parsed = parse_signature_header(header)?;

    let mac = signed_payload_mac(secret, parsed.timestamp, payload)?;
    let valid = parsed
        .signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());

    if !valid {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if now.saturating_sub(parsed.timestamp) > tolerance_secs {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(())
}

/// Produce a `Stripe-Signature` header value for `payload`.
///
/// Used to sign fixtures and local test deliveries.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> PaymentResult<String> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

// =============================================================================
// Event Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    data: Option<StripeEventData>,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    #[serde(default)]
    object: Option<serde_json::Value>,
}

/// Parse an already-verified payload into a `WebhookEvent`
pub fn parse_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
    })?;

    debug!("Parsed Stripe webhook: type={}", event.event_type);

    Ok(WebhookEvent {
        event_id: event.id,
        event_type: WebhookEventType::from_stripe(&event.event_type),
        provider: "stripe".to_string(),
        raw_data: event.data.and_then(|data| data.object),
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Charge Data
// =============================================================================

/// Fields read from a `charge.succeeded` event's charge object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSucceededData {
    pub charge_id: String,
    pub order_id: String,
    pub receipt_url: Option<String>,
}

impl ChargeSucceededData {
    /// Parse from a webhook event
    pub fn from_event(event: &WebhookEvent) -> PaymentResult<Self> {
        let obj = event
            .raw_data
            .as_ref()
            .and_then(|raw| raw.as_object())
            .ok_or_else(|| PaymentError::WebhookParseError("Missing charge object".to_string()))?;

        let charge_id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| PaymentError::WebhookParseError("Missing charge id".to_string()))?;

        let order_id = obj
            .get("metadata")
            .and_then(|m| m.get("orderId"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| {
                PaymentError::WebhookParseError("Missing metadata.orderId".to_string())
            })?;

        let receipt_url = obj
            .get("receipt_url")
            .and_then(|v| v.as_str())
            .map(String::from);

        Ok(Self {
            charge_id,
            order_id,
            receipt_url,
        })
    }

    /// Build the message announced on `payment.succeeded`
    pub fn into_message(self) -> PaymentSucceeded {
        PaymentSucceeded {
            stripe_payment_id: self.charge_id,
            order_id: self.order_id,
            receipt_url: self.receipt_url,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Webhook event handler trait
///
/// Implement this trait to react to verified webhook events.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Called when a charge succeeds
    async fn on_charge_succeeded(&self, data: ChargeSucceededData) -> PaymentResult<()>;

    /// Called for every event type without a dedicated handler
    async fn on_unhandled_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            "Event {} not handled",
            event.event_type
        );
        Ok(())
    }
}

/// Dispatch a webhook event to the appropriate handler method
pub async fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::ChargeSucceeded => match ChargeSucceededData::from_event(event) {
            Ok(data) => handler.on_charge_succeeded(data).await,
            Err(e) => {
                warn!(event_id = %event.event_id, "Skipping charge.succeeded: {}", e);
                Ok(())
            }
        },
        WebhookEventType::ChargeFailed
        | WebhookEventType::ChargeRefunded
        | WebhookEventType::CheckoutCompleted
        | WebhookEventType::CheckoutExpired
        | WebhookEventType::PaymentIntentSucceeded
        | WebhookEventType::PaymentIntentFailed
        | WebhookEventType::Unknown(_) => handler.on_unhandled_event(event).await,
    }
}
