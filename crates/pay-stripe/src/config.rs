//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables once, at start-up.

use pay_core::{CheckoutUrls, PaymentError};
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook endpoint signing secret (whsec_...)
    pub endpoint_secret: String,

    /// Redirect after a completed checkout
    pub success_url: String,

    /// Redirect after a cancelled checkout
    pub cancel_url: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET`
    /// - `STRIPE_SUCCESS_URL`
    /// - `STRIPE_CANCEL_URL`
    /// - `STRIPE_ENDPOINT_SECRET`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
        };

        let secret_key = required("STRIPE_SECRET")?;
        let success_url = required("STRIPE_SUCCESS_URL")?;
        let cancel_url = required("STRIPE_CANCEL_URL")?;
        let endpoint_secret = required("STRIPE_ENDPOINT_SECRET")?;

        let config = Self::new(secret_key, endpoint_secret, success_url, cancel_url);
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        secret_key: impl Into<String>,
        endpoint_secret: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            endpoint_secret: endpoint_secret.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Validate key formats
    pub fn validate(&self) -> Result<(), PaymentError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !self.endpoint_secret.starts_with("whsec_") {
            return Err(PaymentError::Configuration(
                "STRIPE_ENDPOINT_SECRET must start with whsec_".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Redirect URLs for checkout sessions
    pub fn checkout_urls(&self) -> CheckoutUrls {
        CheckoutUrls::new(&self.success_url, &self.cancel_url)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
