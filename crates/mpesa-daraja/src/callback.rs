//! # STK Result Callbacks
//!
//! Daraja posts the final outcome of an STK push to the configured callback
//! URL. Bodies are unauthenticated and are only recorded in the log: nothing
//! here can fail, so the provider always gets an acknowledgement.

use serde_json::Value;
use tracing::{info, warn};

/// Identifiers lifted out of an STK callback for log correlation.
///
/// Every field is optional; an unexpected body just yields an empty summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackSummary {
    pub merchant_request_id: Option<String>,
    pub checkout_request_id: Option<String>,
    pub result_code: Option<i64>,
    pub result_desc: Option<String>,
}

impl CallbackSummary {
    /// Look for `Body.stkCallback` and read what is there.
    pub fn peek(body: &Value) -> Self {
        let Some(callback) = body.get("Body").and_then(|b| b.get("stkCallback")) else {
            return Self::default();
        };

        let text = |key: &str| callback.get(key).and_then(Value::as_str).map(String::from);

        let result_code = callback.get("ResultCode").and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Self {
            merchant_request_id: text("MerchantRequestID"),
            checkout_request_id: text("CheckoutRequestID"),
            result_code,
            result_desc: text("ResultDesc"),
        }
    }

    /// `ResultCode` 0 means the payer completed the payment
    pub fn is_success(&self) -> bool {
        self.result_code == Some(0)
    }
}

/// Record a callback body in the log and summarize it.
pub fn record_callback(body: &[u8]) -> CallbackSummary {
    if body.is_empty() {
        warn!("M-Pesa callback with empty body");
        return CallbackSummary::default();
    }

    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "M-Pesa callback is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(body)
            );
            return CallbackSummary::default();
        }
    };

    let summary = CallbackSummary::peek(&value);

    info!(
        checkout_request_id = summary.checkout_request_id.as_deref().unwrap_or("-"),
        result_code = ?summary.result_code,
        "M-Pesa callback: {}",
        value
    );

    if summary.result_code.is_some() && !summary.is_success() {
        warn!(
            "STK push not completed: checkout_request_id={}, result_desc={}",
            summary.checkout_request_id.as_deref().unwrap_or("-"),
            summary.result_desc.as_deref().unwrap_or("-")
        );
    }

    summary
}
