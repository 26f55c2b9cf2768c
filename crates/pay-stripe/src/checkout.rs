//! # Stripe Checkout Sessions
//!
//! Implementation of Stripe Checkout Sessions API.
//! Sessions are single-payment (`mode=payment`) hosted pages.

use crate::config::StripeConfig;
use crate::webhook::{parse_event, verify_stripe_signature, DEFAULT_TOLERANCE_SECS};
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    CheckoutUrls, PaymentError, PaymentResult, PaymentSessionRequest, PaymentSessionResult,
    PaymentStrategy, WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Stripe gateway ready: mode={}",
            if config.is_test_mode() { "test" } else { "live" }
        );

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Loaded configuration
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build the form body for `POST /v1/checkout/sessions`
    fn build_form_params(
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<Vec<(String, String)>> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), urls.success_url.clone()),
            ("cancel_url".to_string(), urls.cancel_url.clone()),
            (
                "payment_intent_data[metadata][orderId]".to_string(),
                request.order_id.clone(),
            ),
        ];

        for (i, item) in request.items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                request.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount()?.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        Ok(form_params)
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, request, urls), fields(order_id = %request.order_id))]
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<PaymentSessionResult> {
        let form_params = Self::build_form_params(request, urls)?;

        debug!(
            "Creating Stripe checkout session: {} items, currency={}",
            request.items.len(),
            request.currency
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(PaymentSessionResult {
            cancel_url: session.cancel_url.unwrap_or_default(),
            success_url: session.success_url.unwrap_or_default(),
            url: session.url.unwrap_or_default(),
        })
    }

    #[instrument(skip(self, payload, signature, secret), fields(payload_len = payload.len()))]
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
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    success_url: Option<String>,
    #[serde(default)]
    cancel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
