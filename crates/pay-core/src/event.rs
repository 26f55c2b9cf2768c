//! # Webhook Events
//!
//! Verified gateway events and the internal messages derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject on which successful payments are announced
pub const PAYMENT_SUCCEEDED_SUBJECT: &str = "payment.succeeded";

/// Webhook event types we know about.
///
/// New gateway events get a new variant here; everything else lands in
/// `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// `charge.succeeded`
    ChargeSucceeded,
    /// `charge.failed`
    ChargeFailed,
    /// `charge.refunded`
    ChargeRefunded,
    /// `checkout.session.completed`
    CheckoutCompleted,
    /// `checkout.session.expired`
    CheckoutExpired,
    /// `payment_intent.succeeded`
    PaymentIntentSucceeded,
    /// `payment_intent.payment_failed`
    PaymentIntentFailed,
    /// Unknown event (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    /// Map a Stripe `type` string to a known variant
    pub fn from_stripe(event_type: &str) -> Self {
        match event_type {
            "charge.succeeded" => WebhookEventType::ChargeSucceeded,
            "charge.failed" => WebhookEventType::ChargeFailed,
            "charge.refunded" => WebhookEventType::ChargeRefunded,
            "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
            "checkout.session.expired" => WebhookEventType::CheckoutExpired,
            "payment_intent.succeeded" => WebhookEventType::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentIntentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    /// The gateway's name for this event type
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::ChargeSucceeded => "charge.succeeded",
            WebhookEventType::ChargeFailed => "charge.failed",
            WebhookEventType::ChargeRefunded => "charge.refunded",
            WebhookEventType::CheckoutCompleted => "checkout.session.completed",
            WebhookEventType::CheckoutExpired => "checkout.session.expired",
            WebhookEventType::PaymentIntentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentIntentFailed => "payment_intent.payment_failed",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// The event's `data.object`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

/// Announcement that an order has been paid.
///
/// Built once per qualifying event and published on
/// [`PAYMENT_SUCCEEDED_SUBJECT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    /// Gateway charge identifier
    pub stripe_payment_id: String,

    /// Our order identifier
    pub order_id: String,

    /// Receipt page, when the gateway issued one
    pub receipt_url: Option<String>,
}
