//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /payments/create-payment-session - Create checkout session
/// - GET  /payments/success - Landing after payment
/// - GET  /payments/cancel - Landing after cancellation
/// - POST /payments/webhook - Stripe webhook (raw body)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route(
            "/create-payment-session",
            post(handlers::create_payment_session),
        )
        .route("/success", get(handlers::payment_success))
        .route("/cancel", get(handlers::payment_cancel))
        .route("/webhook", post(handlers::stripe_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/payments", payment_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentsService;
    use crate::state::AppConfig;
    use crate::testing::{signed_event, FakeGateway, RecordingPublisher, ENDPOINT_SECRET};
    use axum::body::Bytes;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use pay_core::CheckoutUrls;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct Harness {
        server: TestServer,
        gateway: Arc<FakeGateway>,
        publisher: Arc<RecordingPublisher>,
    }

    fn harness() -> Harness {
        let gateway = Arc::new(FakeGateway::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let payments = PaymentsService::new(
            gateway.clone(),
            publisher.clone(),
            CheckoutUrls::new("https://shop/payments/success", "https://shop/payments/cancel"),
            ENDPOINT_SECRET,
        );
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_format: "pretty".to_string(),
        };
        let state = AppState::new(Arc::new(payments), config);

        Harness {
            server: TestServer::new(create_router(state)).unwrap(),
            gateway,
            publisher,
        }
    }

    fn signature(value: &str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("stripe-signature"),
            HeaderValue::from_str(value).unwrap(),
        )
    }

    fn charge(event_type: &str) -> Value {
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
    async fn test_health() {
        let h = harness();

        let response = h.server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_create_payment_session() {
        let h = harness();

        let response = h
            .server
            .post("/payments/create-payment-session")
            .json(&json!({
                "currency": "usd",
                "items": [{ "name": "Mouse", "price": 19.995, "quantity": 3 }],
                "orderId": "order-123"
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["successUrl"], "https://shop/payments/success");
        assert_eq!(body["cancelUrl"], "https://shop/payments/cancel");
        assert_eq!(body["url"], "https://checkout.test/c/pay/cs_test_1");

        let sessions = h.gateway.sessions.lock().unwrap();
        assert_eq!(sessions[0].order_id, "order-123");
        assert_eq!(sessions[0].items[0].unit_amount().unwrap(), 2000);
        assert_eq!(sessions[0].items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_create_payment_session_empty_items() {
        let h = harness();

        let response = h
            .server
            .post("/payments/create-payment-session")
            .json(&json!({ "currency": "usd", "items": [], "orderId": "order-1" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Invalid request: Payment session requires at least one line item"
        );
        assert!(h.gateway.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_landing_pages() {
        let h = harness();

        let success = h.server.get("/payments/success").await.json::<Value>();
        assert_eq!(success, json!({ "ok": true, "message": "Payment successful" }));

        let cancel = h.server.get("/payments/cancel").await.json::<Value>();
        assert_eq!(cancel, json!({ "ok": false, "message": "Payment cancelled" }));
    }

    #[tokio::test]
    async fn test_webhook_charge_succeeded() {
        let h = harness();
        let (body, sig) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        let (name, value) = signature(&sig);

        let response = h
            .server
            .post("/payments/webhook")
            .add_header(name, value)
            .bytes(Bytes::from(body))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "sig": sig }));
        assert_eq!(
            h.publisher.messages(),
            vec![(
                "payment.succeeded".to_string(),
                json!({ "stripePaymentId": "ch_1", "orderId": "order-123", "receiptUrl": "https://r" })
            )]
        );
    }

    #[tokio::test]
    async fn test_webhook_unhandled_type() {
        let h = harness();
        let (body, sig) = signed_event(&charge("charge.failed"), ENDPOINT_SECRET);
        let (name, value) = signature(&sig);

        let response = h
            .server
            .post("/payments/webhook")
            .add_header(name, value)
            .bytes(Bytes::from(body))
            .await;

        response.assert_status_ok();
        assert!(h.publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_signed_event_without_data() {
        let h = harness();
        let event = json!({ "id": "evt_9", "type": "charge.succeeded" });
        let (body, sig) = signed_event(&event, ENDPOINT_SECRET);
        let (name, value) = signature(&sig);

        let response = h
            .server
            .post("/payments/webhook")
            .add_header(name, value)
            .bytes(Bytes::from(body))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "sig": sig }));
        assert!(h.publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_rejections() {
        let h = harness();
        let (body, good_sig) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);
        let (_, wrong_secret_sig) = signed_event(&charge("charge.succeeded"), "whsec_other");
        let truncated = body[..body.len() / 2].to_vec();

        let cases = vec![
            (body.clone(), "t=abc,v1=zz".to_string()),
            (body.clone(), "garbage".to_string()),
            (body.clone(), wrong_secret_sig),
            (truncated, good_sig),
        ];

        for (payload, sig) in cases {
            let (name, value) = signature(&sig);
            let response = h
                .server
                .post("/payments/webhook")
                .add_header(name, value)
                .bytes(Bytes::from(payload))
                .await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert!(response.text().starts_with("Webhook Error: "));
        }

        assert!(h.publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_missing_signature() {
        let h = harness();
        let (body, _) = signed_event(&charge("charge.succeeded"), ENDPOINT_SECRET);

        let response = h
            .server
            .post("/payments/webhook")
            .bytes(Bytes::from(body))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(h.publisher.messages().is_empty());
    }
}
