//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payments service and the process configuration.

use crate::payments::PaymentsService;
use pay_core::{BoxedEventPublisher, BoxedPaymentStrategy};
use pay_nats::{NatsClient, NatsConfig, NatsPublisher};
use pay_stripe::StripeCheckoutStrategy;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Log output format ("pretty" or "json")
    pub log_format: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3003),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        }
    }

    /// Address to bind to, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json") || self.is_production()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session creator and webhook handler
    pub payments: Arc<PaymentsService>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state around an already-built service
    pub fn new(payments: Arc<PaymentsService>, config: AppConfig) -> Self {
        Self { payments, config }
    }

    /// Build the Stripe gateway and NATS publisher from the environment.
    ///
    /// Returns the NATS client as well, for the request listener.
    pub async fn from_env(config: AppConfig) -> anyhow::Result<(Self, NatsClient)> {
        let stripe = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        let urls = stripe.config().checkout_urls();
        let endpoint_secret = stripe.config().endpoint_secret.clone();

        let nats_config = NatsConfig::from_env()?;
        let nats = NatsClient::connect(&nats_config).await?;

        let gateway: BoxedPaymentStrategy = Arc::new(stripe);
        let publisher: BoxedEventPublisher = Arc::new(NatsPublisher::new(nats.clone()));
        let payments = PaymentsService::new(gateway, publisher, urls, endpoint_secret);

        Ok((Self::new(Arc::new(payments), config), nats))
    }
}
