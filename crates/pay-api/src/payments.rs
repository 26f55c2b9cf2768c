//! # Payments Service
//!
//! The two operations of the service: open a hosted checkout session for an
//! order, and turn verified gateway webhooks into `payment.succeeded`
//! messages. The gateway and the publisher are injected, so nothing here
//! touches the network directly.

use async_trait::async_trait;
use pay_core::{
    BoxedEventPublisher, BoxedPaymentStrategy, CheckoutUrls, PaymentResult,
    PaymentSessionRequest, PaymentSessionResult, PAYMENT_SUCCEEDED_SUBJECT,
};
use pay_stripe::{dispatch_webhook_event, ChargeSucceededData, WebhookHandler};
use tracing::{error, info, instrument, warn};

/// Outcome of a webhook delivery, one per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResponse {
    /// Signature or payload could not be verified (400)
    Rejected { reason: String },
    /// Event verified, whether or not its type was handled (200)
    Accepted { sig: String },
}

/// Session creator and webhook handler
pub struct PaymentsService {
    gateway: BoxedPaymentStrategy,
    publisher: BoxedEventPublisher,
    urls: CheckoutUrls,
    endpoint_secret: String,
}

impl PaymentsService {
    pub fn new(
        gateway: BoxedPaymentStrategy,
        publisher: BoxedEventPublisher,
        urls: CheckoutUrls,
        endpoint_secret: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            publisher,
            urls,
            endpoint_secret: endpoint_secret.into(),
        }
    }

    /// Name of the configured gateway
    pub fn provider_name(&self) -> &'static str {
        self.gateway.provider_name()
    }

    /// Create a hosted checkout session for an order.
    ///
    /// Gateway errors are returned unchanged.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, items = request.items.len()))]
    pub async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> PaymentResult<PaymentSessionResult> {
        request.validate()?;

        info!(
            "Creating payment session: {} units, currency={}",
            request.item_count(),
            request.currency
        );

        let result = self.gateway.create_session(request, &self.urls).await;
        if let Err(e) = &result {
            if e.is_gateway_error() {
                error!("Payment gateway request failed: {}", e);
            }
        }
        result
    }

    /// Verify and process one webhook delivery.
    ///
    /// `payload` must be the raw request body. A missing signature is
    /// treated like an invalid one.
    #[instrument(skip(self, payload, signature), fields(payload_len = payload.len()))]
    pub async fn handle_webhook(&self, payload: &[u8], signature: Option<&str>) -> WebhookResponse {
        let Some(signature) = signature else {
            warn!("Webhook rejected: missing signature header");
            return WebhookResponse::Rejected {
                reason: "No stripe-signature header value was provided".to_string(),
            };
        };

        let event = match self
            .gateway
            .verify_webhook(payload, signature, &self.endpoint_secret)
            .await
        {
            Ok(event) => event,
            Err(e) => {
                warn!("Webhook rejected: {}", e);
                return WebhookResponse::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        info!(
            "Received webhook: type={}, id={}",
            event.event_type, event.event_id
        );

        // The delivery was genuine, so the gateway gets a 200 either way
        if let Err(e) = dispatch_webhook_event(self, &event).await {
            error!(event_id = %event.event_id, "Webhook handler error: {}", e);
        }

        WebhookResponse::Accepted {
            sig: signature.to_string(),
        }
    }
}

#[async_trait]
impl WebhookHandler for PaymentsService {
    async fn on_charge_succeeded(&self, data: ChargeSucceededData) -> PaymentResult<()> {
        let message = data.into_message();

        info!(
            order_id = %message.order_id,
            stripe_payment_id = %message.stripe_payment_id,
            "Publishing {}",
            PAYMENT_SUCCEEDED_SUBJECT
        );

        self.publisher
            .emit_json(PAYMENT_SUCCEEDED_SUBJECT, &message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_event, FakeGateway, RecordingPublisher, ENDPOINT_SECRET};
    use pay_core::{Currency, OrderLineItem, PaymentError};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn service(gateway: Arc<FakeGateway>, publisher: Arc<RecordingPublisher>) -> PaymentsService {
        PaymentsService::new(
            gateway,
            publisher,
            CheckoutUrls::new("https://shop/payments/success", "https://shop/payments/cancel"),
            ENDPOINT_SECRET,
        )
    }

    fn charge(event_type: &str) -> serde_json::Value {
        json!({
            "id": "evt_1",
            "type": event_type,
            "data": {
                "object": {
                    "id": "ch_1",
                    "metadata": { "orderId": "order-123" },
                    "receipt_url": "https://r"
                }
            }
        })
    }

    #[tokio::test]
    async fn test_session_passes_urls_and_amounts() {
        let gateway = Arc::new(FakeGateway::default());
        let service = service(gateway.clone(), Arc::new(RecordingPublisher::default()));

        let request = PaymentSessionRequest::new(Currency::parse("usd").unwrap(), "order-123")
            .with_item(OrderLineItem::new("Mouse", dec!(19.995), 1));
        let result = service.create_payment_session(&request).await.unwrap();

        assert_eq!(result.success_url, "https://shop/payments/success");
        assert_eq!(result.cancel_url, "https://shop/payments/cancel");
        assert!(!result.url.is_empty());

        let sessions = gateway.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].items[0].unit_amount().unwrap(), 2000);
    }

    #[tokio::test]
    async fn test_session_total_quantity_beyond_u32_with_logging_enabled() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .with_test_writer()
                .finish(),
        );
        let gateway = Arc::new(FakeGateway::default());
        let service = service(gateway.clone(), Arc::new(RecordingPublisher::default()));

        let request = PaymentSessionRequest::new(Currency::parse("usd").unwrap(), "order-big")
            .with_item(OrderLineItem::new("Bolt", dec!(0.01), u32::MAX))
            .with_item(OrderLineItem::new("Nut", dec!(0.01), 1));
        service.create_payment_session(&request).await.unwrap();

        assert_eq!(gateway.sessions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_empty_items_never_reaches_gateway() {
        let gateway = Arc::new(FakeGateway::default());
        let service = service(gateway.clone(), Arc::new(RecordingPublisher::default()));

        let request = PaymentSessionRequest::new(Currency::parse("usd").unwrap(), "order-1");
        let err = service.create_payment_session(&request).await.unwrap_err();

        assert!(matches!(err, PaymentError::InvalidRequest(_)));
        assert!(gateway.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_gateway_error_propagates() {
        let gateway = Arc::new(FakeGateway::failing("Invalid currency: zzz"));
        let service = service(gateway, Arc::new(RecordingPublisher::default()));

        let request = PaymentSessionRequest::new(Currency::parse("zzz").unwrap(), "order-1")
            .with_item(OrderLineItem::new("Mouse", dec!(1), 1));
        let err = service.create_payment_session(&request).await.unwrap_err();

        match err {
            PaymentError::ProviderError { message, .. } => {
                assert_eq!(message, "Invalid currency: zzz")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_webhook_charge_succeeded_publishes_once() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, sig) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        let response = service.handle_webhook(&body, Some(sig.as_str())).await;

        assert_eq!(response, WebhookResponse::Accepted { sig: sig.clone() });
        assert_eq!(
            publisher.messages(),
            vec![(
                "payment.succeeded".to_string(),
                json!({ "stripePaymentId": "ch_1", "orderId": "order-123", "receiptUrl": "https://r" })
            )]
        );
    }

    #[tokio::test]
    async fn test_webhook_other_type_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, sig) = signed_event(&charge("charge.failed"), ENDPOINT_SECRET);
        let response = service.handle_webhook(&body, Some(sig.as_str())).await;

        assert!(matches!(response, WebhookResponse::Accepted { .. }));
        assert!(publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_bad_signature_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, sig) = signed_event(&charge("charge.succeeded"), "whsec_wrong");
        let response = service.handle_webhook(&body, Some(sig.as_str())).await;

        assert!(matches!(response, WebhookResponse::Rejected { .. }));
        assert!(publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_missing_signature_rejected() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, _) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        let response = service.handle_webhook(&body, None).await;

        assert!(matches!(response, WebhookResponse::Rejected { .. }));
        assert!(publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_same_event_twice_publishes_twice() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, sig) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        service.handle_webhook(&body, Some(sig.as_str())).await;
        service.handle_webhook(&body, Some(sig.as_str())).await;

        assert_eq!(publisher.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_webhook_publish_failure_still_accepted() {
        let publisher = Arc::new(RecordingPublisher::failing());
        let service = service(Arc::new(FakeGateway::default()), publisher.clone());

        let (body, sig) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        let response = service.handle_webhook(&body, Some(sig.as_str())).await;

        assert!(matches!(response, WebhookResponse::Accepted { .. }));
    }
}
