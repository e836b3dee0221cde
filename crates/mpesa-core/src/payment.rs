//! # Payment Types
//!
//! The caller's payment request and the STK push payload built from it.

use crate::error::{GatewayError, GatewayResult};
use crate::password::StkPassword;
use crate::phone::normalize_phone;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Daraja transaction type for pay-bill STK pushes
pub const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";

/// Account reference shown to the payer on the STK prompt
pub const ACCOUNT_REFERENCE: &str = "PDFBUKS";

/// A non-zero, finite payment amount.
///
/// Whole values are rendered and serialized as integers (`100`, not `100.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    /// Returns `None` for zero, NaN and infinities.
    pub fn new(value: f64) -> Option<Self> {
        if value == 0.0 || !value.is_finite() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&number_text(self.0))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match as_whole(self.0) {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(self.0),
        }
    }
}

fn as_whole(value: f64) -> Option<i64> {
    // Beyond 2^53 an f64 no longer round-trips through i64 exactly
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}

/// Render a number the way a caller typed it: `100`, not `100.0`
fn number_text(value: f64) -> String {
    match as_whole(value) {
        Some(whole) => whole.to_string(),
        None => value.to_string(),
    }
}

/// A validated request to push a payment prompt to a phone.
///
/// Only presence is checked: the phone is kept exactly as entered, and
/// normalization happens when the payload is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    phone: String,
    amount: Amount,
    /// Amount as the caller wrote it, for the transaction description
    amount_text: String,
}

impl PaymentRequest {
    /// Validate a phone and amount supplied directly.
    pub fn new(phone: impl Into<String>, amount: f64) -> GatewayResult<Self> {
        let phone = phone.into();
        if phone.is_empty() {
            return Err(GatewayError::missing_input());
        }
        let amount = Amount::new(amount).ok_or_else(GatewayError::missing_input)?;
        Ok(Self {
            phone,
            amount,
            amount_text: amount.to_string(),
        })
    }

    /// Validate a raw HTTP body.
    ///
    /// Bodies that are empty or not JSON are treated as an empty object, so
    /// they fail with the same message as a request missing both fields.
    pub fn from_body(body: &[u8]) -> GatewayResult<Self> {
        let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
        Self::from_json(&value)
    }

    /// Validate a JSON body of the form `{"phone": ..., "amount": ...}`.
    ///
    /// `phone` may be a string or a number; `amount` may be a number or a
    /// numeric string. Empty strings, zero and `null` count as missing.
    pub fn from_json(body: &Value) -> GatewayResult<Self> {
        let phone = body.get("phone").and_then(phone_field);
        let amount = body.get("amount").and_then(amount_field);

        match (phone, amount) {
            (Some(phone), Some((amount, amount_text))) => Ok(Self {
                phone,
                amount,
                amount_text,
            }),
            _ => Err(GatewayError::missing_input()),
        }
    }

    /// Phone number as entered
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Amount as entered (`"10.50"` stays `"10.50"`)
    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    /// Phone number in international form
    pub fn msisdn(&self) -> String {
        normalize_phone(&self.phone)
    }
}

fn phone_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v != 0.0 && n.is_f64() => Some(number_text(v)),
            Some(v) if v != 0.0 => Some(n.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn amount_field(value: &Value) -> Option<(Amount, String)> {
    match value {
        Value::Number(n) => {
            let amount = n.as_f64().and_then(Amount::new)?;
            Some((amount, amount.to_string()))
        }
        Value::String(s) => {
            let amount = s.trim().parse::<f64>().ok().and_then(Amount::new)?;
            Some((amount, s.clone()))
        }
        _ => None,
    }
}

/// Body of a Daraja `stkpush/v1/processrequest` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushPayload {
    pub business_short_code: String,
    pub password: String,
    pub timestamp: String,
    pub transaction_type: String,
    pub amount: Amount,
    /// Paying MSISDN
    pub party_a: String,
    /// Receiving shortcode
    pub party_b: String,
    pub phone_number: String,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    pub account_reference: String,
    pub transaction_desc: String,
}

impl StkPushPayload {
    /// Assemble the push payload for a validated request.
    pub fn assemble(
        shortcode: &str,
        stk: StkPassword,
        request: &PaymentRequest,
        callback_url: &str,
    ) -> Self {
        let msisdn = request.msisdn();
        let (password, timestamp) = stk.into_parts();

        Self {
            business_short_code: shortcode.to_string(),
            password,
            timestamp,
            transaction_type: TRANSACTION_TYPE.to_string(),
            amount: request.amount(),
            party_a: msisdn.clone(),
            party_b: shortcode.to_string(),
            phone_number: msisdn,
            callback_url: callback_url.to_string(),
            account_reference: ACCOUNT_REFERENCE.to_string(),
            transaction_desc: format!("Payment of {}", request.amount_text()),
        }
    }
}
