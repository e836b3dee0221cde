//! # Phone Normalization
//!
//! Turns user-entered Kenyan numbers into the MSISDN form Daraja expects.

/// Country code substituted for a leading trunk `0`
pub const COUNTRY_CODE: &str = "254";

/// Normalize a raw phone number to international form.
///
/// Whitespace is trimmed and a leading `0` becomes `254`. Everything else
/// (already international, `+254...`, garbage) is returned as-is; the provider
/// has the final say on whether the number is valid.
pub fn normalize_phone(raw: &str) -> String {
    let msisdn = raw.trim();
    match msisdn.strip_prefix('0') {
        Some(rest) => format!("{}{}", COUNTRY_CODE, rest),
        None => msisdn.to_string(),
    }
}
