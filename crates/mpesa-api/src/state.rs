//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment gateway, the clock and the server configuration.
//! Everything in here is read-only after startup.

use mpesa_core::{BoxedGateway, SharedClock, SystemClock};
use mpesa_daraja::DarajaClient;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use tracing::info;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// STK push gateway
    pub gateway: BoxedGateway,
    /// Source of "now" for health checks
    pub clock: SharedClock,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Daraja client
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let client = DarajaClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Daraja: {}", e))?;

        info!(
            "Daraja: environment={}, shortcode={}, callback_url={}",
            client.config().environment,
            client.config().credentials.shortcode,
            client.config().callback_url
        );

        Ok(Self::with_gateway(Arc::new(client), config))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(gateway: BoxedGateway, config: AppConfig) -> Self {
        Self {
            gateway,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Builder: replace the clock
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_app_config_from_vars() {
        let vars: HashMap<&str, &str> = [("HOST", "127.0.0.1"), ("PORT", "3000")].into();
        let config = AppConfig::from_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = AppConfig::from_vars(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let config = AppConfig {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(config.socket_addr().is_err());
    }
}
