//! # STK Password Derivation
//!
//! Daraja authenticates each push request with
//! `base64(shortcode + passkey + timestamp)`, and re-derives it server side
//! from the `Timestamp` field of the same request. The two values are
//! produced together as an [`StkPassword`] and must travel together.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, FixedOffset, Utc};

/// Africa/Nairobi is UTC+03:00 with no daylight saving.
const NAIROBI_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// `YYYYMMDDHHmmss`
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A password and the timestamp it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPassword {
    password: String,
    timestamp: String,
}

impl StkPassword {
    /// Derive the password for `now`, expressed in Nairobi local time.
    pub fn derive(shortcode: &str, passkey: &str, now: DateTime<Utc>) -> Self {
        let timestamp = nairobi_timestamp(now);
        let password = encode_password(shortcode, passkey, &timestamp);
        Self {
            password,
            timestamp,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Consume into `(password, timestamp)`
    pub fn into_parts(self) -> (String, String) {
        (self.password, self.timestamp)
    }
}

/// Format an instant as a Daraja timestamp in Nairobi local time.
pub fn nairobi_timestamp(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(NAIROBI_UTC_OFFSET_SECS) {
        Some(nairobi) => now.with_timezone(&nairobi).format(TIMESTAMP_FORMAT).to_string(),
        // east_opt only rejects offsets of a full day or more
        None => unreachable!(),
    }
}

/// `base64(shortcode + passkey + timestamp)`
pub fn encode_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{}{}{}", shortcode, passkey, timestamp))
}
