//! Social RL data server.
//!
//! Main entry point. Initializes structured logging, loads configuration,
//! prepares the output directory, and serves HTTP until a shutdown signal
//! arrives.

use anyhow::{Context, Result};
use srl_api::{AppState, Config};
use srl_core::SubmissionStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting Social RL data server");

    // Load configuration from defaults, config file, and environment
    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        host = %config.host,
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Configuration loaded"
    );

    // Prepare the output directory before accepting traffic
    let store = SubmissionStore::open(&config.data_dir).with_context(|| {
        format!("failed to prepare data directory {}", config.data_dir.display())
    })?;
    info!(data_dir = %store.root().display(), "Data will be saved to output directory");

    let state = AppState::new(store);

    info!(%addr, "Social RL data server is ready to receive submissions");

    // Serves until CTRL+C/SIGTERM, then drains in-flight requests
    srl_api::start_server(state, addr).await.context("HTTP server failed")?;

    info!("Social RL data server shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,srl_api=debug,srl_core=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
