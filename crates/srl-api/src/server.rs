//! HTTP server configuration and request routing.
//!
//! Provides Axum server setup with middleware stack and graceful shutdown
//! for the submission ingest endpoints. Requests flow through middleware
//! in order:
//! 1. Request ID generation
//! 2. CORS handling (any origin)
//! 3. Request/response logging
//! 4. Timeout enforcement (30s)
//! 5. Body size cap (8 MiB)
//! 6. Handler execution
//!
//! # Graceful Shutdown
//!
//! The server handles SIGTERM gracefully:
//! - Stops accepting new connections
//! - Waits for in-flight requests (30s max)
//! - Returns once the listener has drained

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use srl_core::{Clock, SubmissionStore, SystemClock};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers;

/// Request timeout applied to every route.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level body cap. Sits well above the 1 MiB payload limit so
/// oversized-but-bounded payloads still reach the JSON error path instead
/// of a bare 413.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Shared state injected into request handlers.
///
/// Carries the submission store (bound to the configured output directory)
/// and the clock used for timestamp capture.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Store writing accepted submissions to the output directory.
    pub store: Arc<SubmissionStore>,
    /// Time source for `saved_at` metadata and filename stamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates application state with the system clock.
    pub fn new(store: SubmissionStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock::new()))
    }

    /// Creates application state with an injected clock.
    pub fn with_clock(store: SubmissionStore, clock: Arc<dyn Clock>) -> Self {
        Self { store: Arc::new(store), clock }
    }
}

/// Creates the Axum router with all routes and middleware.
///
/// Sets up:
/// - Submission ingest endpoints (`POST /` and its historical alias
///   `POST /save-data`)
/// - Health check endpoint
/// - Request tracing, timeout handling, permissive CORS
///
/// # Example
///
/// ```no_run
/// use srl_api::{create_router, AppState};
/// use srl_core::SubmissionStore;
///
/// fn build() -> axum::Router {
///     let store = SubmissionStore::open("data").expect("output directory");
///     create_router(AppState::new(store))
/// }
/// ```
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(handlers::health_check));

    let api_routes = Router::new()
        .route("/", post(handlers::save_submission))
        .route("/save-data", post(handlers::save_submission));

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Middleware to inject request ID into all responses.
///
/// Adds X-Request-Id header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address and serves requests until a shutdown
/// signal is received.
///
/// # Errors
///
/// Returns `std::io::Error` if:
/// - Port is already in use
/// - Network interface unavailable
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
///
/// Enables graceful shutdown on:
/// - CTRL+C (SIGINT) - Development
/// - SIGTERM - Kubernetes/Docker
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting up to 30 seconds for in-flight requests to complete");
}
