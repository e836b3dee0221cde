//! # mpesa-stk
//!
//! M-Pesa STK push gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export MPESA_CONSUMER_KEY=...
//! export MPESA_CONSUMER_SECRET=...
//! export MPESA_PASSKEY=...
//! export MPESA_CALLBACK_URL=https://your-host/mpesa-callback
//!
//! # Run the server
//! mpesa-stk
//! ```

use mpesa_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state
        .config
        .socket_addr()
        .map_err(|e| anyhow::anyhow!("Invalid HOST/PORT: {}", e))?;

    // Create router
    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);
    info!("STK push: POST http://{}/stkpush", addr);
    info!("Callback: POST http://{}/mpesa-callback", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` emits JSON lines.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  M-Pesa STK Gateway
  ━━━━━━━━━━━━━━━━━━
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
