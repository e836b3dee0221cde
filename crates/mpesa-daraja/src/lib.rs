//! # mpesa-daraja
//!
//! Safaricom Daraja client for the M-Pesa STK push gateway.
//!
//! - **DarajaClient** - OAuth token + STK push (`Lipa na M-Pesa Online`)
//! - **record_callback** - audit logging of asynchronous result callbacks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mpesa_core::PaymentRequest;
//! use mpesa_daraja::DarajaClient;
//!
//! // Create client from environment
//! let client = DarajaClient::from_env()?;
//!
//! // Push a payment prompt to the payer's phone
//! let request = PaymentRequest::new("0712345678", 10.0)?;
//! let ack = client.initiate_payment(&request).await?;
//!
//! // ack carries MerchantRequestID / CheckoutRequestID; the outcome
//! // arrives later at MPESA_CALLBACK_URL
//! ```

pub mod callback;
pub mod client;
pub mod config;

// Re-exports
pub use callback::{record_callback, CallbackSummary};
pub use client::DarajaClient;
pub use config::{Credentials, DarajaConfig, DarajaEnvironment};
