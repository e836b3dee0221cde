//! # mpesa-core
//!
//! Core types and rules for the M-Pesa STK push gateway.
//!
//! This crate provides:
//! - `StkPushGateway` trait for provider clients
//! - `PaymentRequest` validation and `StkPushPayload` assembly
//! - `StkPassword` derivation and `normalize_phone`
//! - `Clock` for injectable time
//! - `GatewayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use mpesa_core::{PaymentRequest, StkPassword, StkPushPayload};
//!
//! let request = PaymentRequest::new("0712345678", 10.0)?;
//! let stk = StkPassword::derive("174379", passkey, clock.now());
//! let payload = StkPushPayload::assemble("174379", stk, &request, callback_url);
//! ```

pub mod clock;
pub mod error;
pub mod gateway;
pub mod password;
pub mod payment;
pub mod phone;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use error::{GatewayError, GatewayResult, UpstreamFailure, MISSING_INPUT_MESSAGE};
pub use gateway::{BoxedGateway, StkPushGateway};
pub use password::{encode_password, nairobi_timestamp, StkPassword};
pub use payment::{Amount, PaymentRequest, StkPushPayload, ACCOUNT_REFERENCE, TRANSACTION_TYPE};
pub use phone::normalize_phone;
