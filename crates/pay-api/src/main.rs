//! # payments-ms
//!
//! Payments micro-service: hosted checkout sessions and Stripe webhooks.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET=sk_test_...
//! export STRIPE_SUCCESS_URL=http://localhost:3003/payments/success
//! export STRIPE_CANCEL_URL=http://localhost:3003/payments/cancel
//! export STRIPE_ENDPOINT_SECRET=whsec_...
//! export NATS_SERVERS=nats://localhost:4222
//!
//! # Run the server
//! payments-ms
//! ```

use pay_api::{listener, routes, state::AppConfig, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    init_tracing(&config);

    let (state, nats) = AppState::from_env(config).await?;

    let addr = state.config.bind_addr();
    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.payments.provider_name());

    // Message-pattern entry point
    let listener_task = tokio::spawn(listener::run(nats.clone(), state.payments.clone()));

    let app = routes::create_router(state);

    info!("payments-ms listening on http://{}", addr);
    info!("Webhook: POST http://{}/payments/webhook", addr);

    let tcp = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(tcp, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    listener_task.abort();
    if let Err(e) = nats.flush().await {
        error!("Failed to flush NATS on shutdown: {}", e);
    }

    info!("payments-ms stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
