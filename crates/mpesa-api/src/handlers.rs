//! # Request Handlers
//!
//! Axum request handlers for the STK push API.

use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::SecondsFormat;
use mpesa_core::{GatewayError, PaymentRequest};
use mpesa_daraja::record_callback;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response.
///
/// `error` is either a message or the payment provider's own error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: Value,
}

impl ErrorResponse {
    pub fn new(error: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn gateway_error_to_response(err: GatewayError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.detail())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "time": state.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}

/// Push a payment prompt to the payer's phone.
///
/// The body is read raw so an empty or malformed body gets the same 400 as a
/// request missing its fields.
#[instrument(skip(state, body))]
pub async fn stk_push(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let request = PaymentRequest::from_body(&body).map_err(gateway_error_to_response)?;

    info!(
        "STK push requested: provider={}, amount={}",
        state.gateway.provider_name(),
        request.amount()
    );

    let response = state
        .gateway
        .initiate_payment(&request)
        .await
        .map_err(|e| {
            error!("STK Push Error: {}", e);
            gateway_error_to_response(e)
        })?;

    Ok(Json(response))
}

/// Receive an STK result callback.
///
/// Always acknowledged so the provider does not keep redelivering.
pub async fn mpesa_callback(body: Bytes) -> Json<Value> {
    record_callback(&body);
    Json(json!({ "received": true }))
}
