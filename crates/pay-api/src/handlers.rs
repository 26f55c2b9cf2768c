//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::payments::WebhookResponse;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{PaymentError, PaymentSessionRequest, PaymentSessionResult};
use pay_stripe::SIGNATURE_HEADER;
use serde::Serialize;
use tracing::{error, instrument};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Body of the success/cancel landing endpoints
#[derive(Debug, Serialize)]
pub struct RedirectPageResponse {
    pub ok: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
struct WebhookAck<'a> {
    sig: &'a str,
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self {
            WebhookResponse::Rejected { reason } => (
                StatusCode::BAD_REQUEST,
                format!("Webhook Error: {}", reason),
            )
                .into_response(),
            WebhookResponse::Accepted { sig } => {
                (StatusCode::OK, Json(WebhookAck { sig: &sig })).into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payments-ms",
        "provider": state.payments.provider_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for an order
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_payment_session(
    State(state): State<AppState>,
    Json(request): Json<PaymentSessionRequest>,
) -> Result<Json<PaymentSessionResult>, (StatusCode, Json<ErrorResponse>)> {
    let session = state
        .payments
        .create_payment_session(&request)
        .await
        .map_err(|e| {
            error!("Failed to create payment session: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(session))
}

/// Landing endpoint after a completed checkout
pub async fn payment_success() -> Json<RedirectPageResponse> {
    Json(RedirectPageResponse {
        ok: true,
        message: "Payment successful",
    })
}

/// Landing endpoint after a cancelled checkout
pub async fn payment_cancel() -> Json<RedirectPageResponse> {
    Json(RedirectPageResponse {
        ok: false,
        message: "Payment cancelled",
    })
}

/// Handle Stripe webhook.
///
/// The body is taken as raw `Bytes`; it must not be parsed before the
/// signature has been checked.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    state.payments.handle_webhook(&body, signature).await
}
