//! NATS connection configuration.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_NAME: &str = "payments-ms";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the NATS connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// Server URLs (`nats://host:4222`)
    pub servers: Vec<String>,

    /// Client connection name for debugging and monitoring
    pub client_name: Option<String>,

    /// Connection timeout
    pub connect_timeout: Option<Duration>,
}

impl NatsConfig {
    /// Create a configuration for the given servers
    pub fn new(servers: Vec<String>) -> Self {
        Self {
            servers,
            client_name: None,
            connect_timeout: None,
        }
    }

    /// Load from environment variables.
    ///
    /// - `NATS_SERVERS` (required, comma-separated)
    /// - `NATS_CLIENT_NAME` (optional)
    /// - `NATS_CONNECT_TIMEOUT_SECS` (optional)
    pub fn from_env() -> Result<Self> {
        let raw = env::var("NATS_SERVERS")
            .map_err(|_| Error::InvalidConfig("NATS_SERVERS not set".to_string()))?;

        let mut config = Self::new(Self::parse_servers(&raw)?);
        config.client_name = env::var("NATS_CLIENT_NAME").ok();
        config.connect_timeout = env::var("NATS_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        Ok(config)
    }

    /// Split a comma-separated server list, dropping blanks
    pub fn parse_servers(raw: &str) -> Result<Vec<String>> {
        let servers: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if servers.is_empty() {
            return Err(Error::InvalidConfig(
                "NATS_SERVERS must list at least one server".to_string(),
            ));
        }

        Ok(servers)
    }

    /// Returns the client name, using the default if not set.
    #[inline]
    pub fn name(&self) -> &str {
        self.client_name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the connection timeout, using the default if not set.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    /// Server list in the comma-separated form accepted by `async_nats`
    pub fn server_list(&self) -> String {
        self.servers.join(",")
    }
}
