//! # Routes
//!
//! Axum router configuration for the STK push API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health         - Liveness check (also served at /)
///   - POST /stkpush        - Initiate an STK push
///   - POST /mpesa-callback - Daraja result callback
pub fn create_router(state: AppState) -> Router {
    // Browser clients call /stkpush directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/stkpush", post(handlers::stk_push))
        .route("/mpesa-callback", post(handlers::mpesa_callback))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
