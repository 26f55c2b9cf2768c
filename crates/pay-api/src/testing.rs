//! In-process fakes for the gateway and the message bus.

use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    CheckoutUrls, EventPublisher, PaymentError, PaymentResult, PaymentSessionRequest,
    PaymentSessionResult, PaymentStrategy, WebhookEvent,
};
use pay_stripe::webhook::{parse_event, DEFAULT_TOLERANCE_SECS};
use pay_stripe::{sign_payload, verify_stripe_signature};
use std::sync::Mutex;

pub const ENDPOINT_SECRET: &str = "whsec_test_endpoint";

/// Gateway that records session requests and verifies real signatures
#[derive(Default)]
pub struct FakeGateway {
    pub sessions: Mutex<Vec<PaymentSessionRequest>>,
    failure: Option<String>,
}

impl FakeGateway {
    /// Gateway whose session creation always fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl PaymentStrategy for FakeGateway {
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<PaymentSessionResult> {
        if let Some(message) = &self.failure {
            return Err(PaymentError::ProviderError {
                provider: "fake".to_string(),
                message: message.clone(),
            });
        }

        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(request.clone());

        Ok(PaymentSessionResult {
            cancel_url: urls.cancel_url.clone(),
            success_url: urls.success_url.clone(),
            url: format!("https://checkout.test/c/pay/cs_test_{}", sessions.len()),
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> PaymentResult<WebhookEvent> {
        verify_stripe_signature(
            payload,
            signature,
            secret,
            Utc::now().timestamp(),
            DEFAULT_TOLERANCE_SECS,
        )?;
        parse_event(payload)
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Publisher that keeps every message it is given
#[derive(Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<(String, serde_json::Value)>>,
    fail: bool,
}

impl RecordingPublisher {
    /// Publisher whose every emit fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<(String, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn emit(&self, subject: &str, payload: serde_json::Value) -> PaymentResult<()> {
        if self.fail {
            return Err(PaymentError::PublishFailed {
                subject: subject.to_string(),
                reason: "connection closed".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), payload));
        Ok(())
    }
}

/// Serialize `event` and sign it with `secret` as of now
pub fn signed_event(event: &serde_json::Value, secret: &str) -> (Vec<u8>, String) {
    let body = serde_json::to_vec(event).unwrap();
    let sig = sign_payload(&body, secret, Utc::now().timestamp()).unwrap();
    (body, sig)
}
