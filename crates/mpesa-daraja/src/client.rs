//! # Daraja Client
//!
//! OAuth token retrieval and STK push submission against the Daraja API.
//! Every push fetches a fresh token; nothing is cached or retried.

use crate::config::DarajaConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use mpesa_core::{
    GatewayError, GatewayResult, PaymentRequest, SharedClock, StkPassword, StkPushGateway,
    StkPushPayload, SystemClock, UpstreamFailure,
};
use reqwest::{header::AUTHORIZATION, Client};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// STK push gateway backed by Safaricom Daraja
pub struct DarajaClient {
    config: DarajaConfig,
    client: Client,
    clock: SharedClock,
}

impl DarajaClient {
    /// Create a new Daraja client using the system clock
    pub fn new(config: DarajaConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        let config = DarajaConfig::from_env()?;
        Self::new(config)
    }

    /// Builder: replace the clock used for STK timestamps
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &DarajaConfig {
        &self.config
    }

    /// `Basic base64(consumer_key:consumer_secret)`
    fn basic_auth_header(&self) -> String {
        let credentials = &self.config.credentials;
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            credentials.consumer_key, credentials.consumer_secret
        ));
        format!("Basic {}", encoded)
    }

    /// Fetch a fresh OAuth access token.
    ///
    /// Non-2xx responses fail with [`GatewayError::UpstreamAuth`] carrying
    /// the provider's body unmodified.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> GatewayResult<String> {
        let response = self
            .client
            .get(self.config.auth_url())
            .header(AUTHORIZATION, self.basic_auth_header())
            .send()
            .await
            .map_err(|e| {
                error!("Daraja auth request failed: {}", e);
                GatewayError::UpstreamAuth(UpstreamFailure::message(e.to_string()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamAuth(UpstreamFailure::message(e.to_string())))?;

        if !status.is_success() {
            error!("Daraja auth error: status={}, body={}", status, body);
            return Err(GatewayError::UpstreamAuth(UpstreamFailure::from_response(
                status.as_u16(),
                &body,
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Daraja auth response has no access token: {}", e);
            GatewayError::UpstreamAuth(UpstreamFailure {
                status: Some(status.as_u16()),
                detail: serde_json::from_str(&body).unwrap_or_else(|_| {
                    Value::String("Auth response did not include an access token".to_string())
                }),
            })
        })?;

        debug!("Obtained Daraja access token, expires_in={:?}", token.expires_in);

        Ok(token.access_token)
    }

    /// Assemble the push payload for `request` as of `now`.
    ///
    /// Password and timestamp are derived together on every call.
    pub fn build_payload(&self, request: &PaymentRequest, now: DateTime<Utc>) -> StkPushPayload {
        let credentials = &self.config.credentials;
        let stk = StkPassword::derive(&credentials.shortcode, &credentials.passkey, now);

        StkPushPayload::assemble(&credentials.shortcode, stk, request, &self.config.callback_url)
    }

    /// Authenticate, then submit an STK push.
    ///
    /// Returns the provider's response body verbatim. Failures of either call
    /// surface as [`GatewayError::UpstreamRequest`].
    #[instrument(skip(self, request), fields(amount = %request.amount()))]
    pub async fn initiate_payment(&self, request: &PaymentRequest) -> GatewayResult<Value> {
        let token = self
            .authenticate()
            .await
            .map_err(GatewayError::into_request_error)?;

        let payload = self.build_payload(request, self.clock.now());

        debug!(
            "Submitting STK push: msisdn={}, timestamp={}",
            payload.phone_number, payload.timestamp
        );

        let response = self
            .client
            .post(self.config.stk_push_url())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("STK push request failed: {}", e);
                GatewayError::UpstreamRequest(UpstreamFailure::message(e.to_string()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamRequest(UpstreamFailure::message(e.to_string())))?;

        if !status.is_success() {
            error!("STK push error: status={}, body={}", status, body);
            return Err(GatewayError::UpstreamRequest(UpstreamFailure::from_response(
                status.as_u16(),
                &body,
            )));
        }

        let body: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));

        let merchant_request_id = body
            .get("MerchantRequestID")
            .and_then(Value::as_str)
            .unwrap_or("-");
        let checkout_request_id = body
            .get("CheckoutRequestID")
            .and_then(Value::as_str)
            .unwrap_or("-");
        info!(
            "STK push accepted: merchant_request_id={}, checkout_request_id={}",
            merchant_request_id, checkout_request_id
        );

        Ok(body)
    }
}

#[async_trait]
impl StkPushGateway for DarajaClient {
    async fn initiate_payment(&self, request: &PaymentRequest) -> GatewayResult<Value> {
        DarajaClient::initiate_payment(self, request).await
    }

    fn provider_name(&self) -> &'static str {
        "daraja"
    }
}

// =============================================================================
// Daraja API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    // Daraja sends this as a string ("3599")
    #[serde(default)]
    expires_in: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> DarajaClient {
        let config = DarajaConfig::new("key", "secret", "passkey")
            .with_callback_url("https://example.com/mpesa-callback");
        DarajaClient::new(config).unwrap()
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(client().basic_auth_header(), "Basic a2V5OnNlY3JldA==");
    }

    #[test]
    fn test_build_payload() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let request = PaymentRequest::new("0712345678", 1.0).unwrap();

        let payload = client().build_payload(&request, now);

        assert_eq!(payload.business_short_code, "174379");
        assert_eq!(payload.party_b, "174379");
        assert_eq!(payload.timestamp, "20240101120000");
        assert_eq!(payload.password, "MTc0Mzc5cGFzc2tleTIwMjQwMTAxMTIwMDAw");
        assert_eq!(payload.party_a, "254712345678");
        assert_eq!(payload.phone_number, "254712345678");
        assert_eq!(payload.callback_url, "https://example.com/mpesa-callback");
        assert_eq!(payload.transaction_desc, "Payment of 1");
    }

    #[test]
    fn test_build_payload_with_shortcode() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let config = DarajaConfig::new("key", "secret", "passkey").with_shortcode("600000");
        let request = PaymentRequest::new("254712345678", 5.0).unwrap();

        let payload = DarajaClient::new(config).unwrap().build_payload(&request, now);

        assert_eq!(payload.business_short_code, "600000");
        assert_eq!(payload.party_b, "600000");
        assert_eq!(
            payload.password,
            mpesa_core::encode_password("600000", "passkey", "20240101120000")
        );
        assert_ne!(
            payload.password,
            mpesa_core::encode_password("174379", "passkey", "20240101120000")
        );
    }

    #[test]
    fn test_token_response_parsing() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":"3599"}"#).unwrap();
        assert_eq!(token.access_token, "abc");

        assert!(serde_json::from_str::<TokenResponse>(r#"{"expires_in":"3599"}"#).is_err());
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(StkPushGateway::provider_name(&client()), "daraja");
    }
}
