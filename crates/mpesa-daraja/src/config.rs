//! # Daraja Configuration
//!
//! Configuration management for the Daraja integration.
//! All secrets are loaded from environment variables once at startup.

use mpesa_core::{GatewayError, GatewayResult};
use std::env;
use std::fmt;
use std::time::Duration;

/// Sandbox merchant shortcode
pub const DEFAULT_SHORTCODE: &str = "174379";

/// Where Daraja posts payment results when `MPESA_CALLBACK_URL` is unset
pub const DEFAULT_CALLBACK_URL: &str = "https://mpesa-stk-render.onrender.com";

/// Outbound request timeout when `MPESA_HTTP_TIMEOUT_SECS` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";
pub const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

/// Daraja deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DarajaEnvironment {
    Sandbox,
    Production,
}

impl DarajaEnvironment {
    fn parse(value: &str) -> GatewayResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(GatewayError::Configuration(format!(
                "MPESA_ENVIRONMENT must be sandbox or production, got {}",
                other
            ))),
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for DarajaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Merchant credentials, fixed for the lifetime of the process
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub shortcode: String,
    pub passkey: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[redacted]")
            .field("shortcode", &self.shortcode)
            .field("passkey", &"[redacted]")
            .finish()
    }
}

/// Daraja API configuration
#[derive(Debug, Clone)]
pub struct DarajaConfig {
    pub credentials: Credentials,

    /// URL Daraja posts the payment result to
    pub callback_url: String,

    /// Deployment the default base URL was chosen from
    pub environment: DarajaEnvironment,

    /// API base URL (overridable for testing/mocking)
    pub api_base_url: String,

    /// Timeout applied to each outbound call
    pub timeout: Duration,
}

impl DarajaConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MPESA_CONSUMER_KEY`
    /// - `MPESA_CONSUMER_SECRET`
    /// - `MPESA_PASSKEY`
    ///
    /// Optional: `MPESA_SHORTCODE`, `MPESA_CALLBACK_URL`, `MPESA_ENVIRONMENT`,
    /// `MPESA_API_BASE_URL`, `MPESA_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> GatewayResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| GatewayError::Configuration(format!("{} not set", key)))
        };

        let credentials = Credentials {
            consumer_key: required("MPESA_CONSUMER_KEY")?,
            consumer_secret: required("MPESA_CONSUMER_SECRET")?,
            shortcode: var("MPESA_SHORTCODE").unwrap_or_else(|| DEFAULT_SHORTCODE.to_string()),
            passkey: required("MPESA_PASSKEY")?,
        };

        let environment = match var("MPESA_ENVIRONMENT") {
            Some(value) => DarajaEnvironment::parse(&value)?,
            None => DarajaEnvironment::Sandbox,
        };

        let api_base_url = var("MPESA_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| environment.base_url().to_string());

        let timeout_secs = match var("MPESA_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                GatewayError::Configuration(format!(
                    "MPESA_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {}",
                    value
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials,
            callback_url: var("MPESA_CALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_CALLBACK_URL.to_string()),
            environment,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with explicit credentials and defaults for the rest (for testing)
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        passkey: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials {
                consumer_key: consumer_key.into(),
                consumer_secret: consumer_secret.into(),
                shortcode: DEFAULT_SHORTCODE.to_string(),
                passkey: passkey.into(),
            },
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            environment: DarajaEnvironment::Sandbox,
            api_base_url: SANDBOX_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// OAuth token endpoint
    pub fn auth_url(&self) -> String {
        format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.api_base_url
        )
    }

    /// STK push endpoint
    pub fn stk_push_url(&self) -> String {
        format!("{}/mpesa/stkpush/v1/processrequest", self.api_base_url)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set shortcode
    pub fn with_shortcode(mut self, shortcode: impl Into<String>) -> Self {
        self.credentials.shortcode = shortcode.into();
        self
    }

    /// Builder: set callback URL
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = url.into();
        self
    }
}
