//! # mpesa-api
//!
//! HTTP API layer for the M-Pesa STK push gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - STK push endpoint wrapping the Daraja client
//! - Callback endpoint for asynchronous payment results
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/stkpush` | Push a payment prompt (`{phone, amount}`) |
//! | POST | `/mpesa-callback` | Daraja result callback |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
