//! # STK Push Gateway Trait
//!
//! The seam between the HTTP layer and whatever actually talks to the
//! payment provider. The Daraja client is the production implementation;
//! tests swap in doubles.
//!
//! ```text
//! ┌──────────────┐   initiate_payment()   ┌─────────────────────┐
//! │  POST        │ ─────────────────────► │ StkPushGateway      │
//! │  /stkpush    │                        │  (trait)            │
//! └──────────────┘                        └─────────┬───────────┘
//!                                                   │
//!                                         ┌─────────┴───────────┐
//!                                         │ DarajaClient        │
//!                                         │  auth → push        │
//!                                         └─────────────────────┘
//! ```

use crate::error::GatewayResult;
use crate::payment::PaymentRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Submits STK push requests to a payment provider.
#[async_trait]
pub trait StkPushGateway: Send + Sync {
    /// Push a payment prompt to the payer's phone.
    ///
    /// # Returns
    /// The provider's response body, unmodified. It acknowledges the request
    /// (request identifiers); the payment outcome arrives later by callback.
    async fn initiate_payment(&self, request: &PaymentRequest) -> GatewayResult<Value>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn StkPushGateway>;
