//! # Gateway Error Types
//!
//! Typed error handling for the STK push gateway.
//! All gateway operations return `Result<T, GatewayError>`.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Message returned when a payment request lacks a phone number or amount
pub const MISSING_INPUT_MESSAGE: &str = "Provide phone and amount";

/// What the payment provider told us when a call went wrong.
///
/// `detail` is the provider's response body when it sent one (parsed JSON,
/// or the raw text when it is not JSON), otherwise the transport error message.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamFailure {
    /// HTTP status returned by the provider, if a response was received
    pub status: Option<u16>,
    /// Provider error payload or failure message
    pub detail: Value,
}

impl UpstreamFailure {
    /// Build from a non-2xx provider response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            Value::String(format!("Request failed with status code {}", status))
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };

        Self {
            status: Some(status),
            detail,
        }
    }

    /// Build from a failure where no usable response arrived.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: Value::String(message.into()),
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.detail) {
            (Some(status), Value::String(s)) => write!(f, "HTTP {}: {}", status, s),
            (Some(status), detail) => write!(f, "HTTP {}: {}", status, detail),
            (None, Value::String(s)) => f.write_str(s),
            (None, detail) => write!(f, "{}", detail),
        }
    }
}

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required input missing from the caller's request
    #[error("{0}")]
    Validation(String),

    /// Configuration errors (missing credentials, bad URLs, client setup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token request to the provider failed
    #[error("Upstream auth error: {0}")]
    UpstreamAuth(UpstreamFailure),

    /// Push request to the provider failed
    #[error("Upstream request error: {0}")]
    UpstreamRequest(UpstreamFailure),
}

impl GatewayError {
    /// The validation error for an incomplete payment request
    pub fn missing_input() -> Self {
        GatewayError::Validation(MISSING_INPUT_MESSAGE.to_string())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::Configuration(_) => 500,
            GatewayError::UpstreamAuth(_) => 500,
            GatewayError::UpstreamRequest(_) => 500,
        }
    }

    /// Payload rendered as the `error` field of an HTTP error body.
    ///
    /// Upstream failures surface the provider's own payload unmodified.
    pub fn detail(&self) -> Value {
        match self {
            GatewayError::Validation(message) => Value::String(message.clone()),
            GatewayError::Configuration(message) => Value::String(message.clone()),
            GatewayError::UpstreamAuth(failure) | GatewayError::UpstreamRequest(failure) => {
                failure.detail.clone()
            }
        }
    }

    /// Re-tag an auth failure as a failure of the overall push request.
    pub fn into_request_error(self) -> Self {
        match self {
            GatewayError::UpstreamAuth(failure) => GatewayError::UpstreamRequest(failure),
            other => other,
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
