//! Submission ingest handler with validation and persistence.
//!
//! Accepts incoming JSON payloads, validates shape and size, sanitizes the
//! identifying fields, and persists each submission as a timestamped file
//! in the output directory.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use srl_core::{parse_json, IngestError, Submission};
use tracing::{error, info, instrument, warn};

use crate::server::AppState;

/// Response from a successfully saved submission.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// Always `success`
    pub status: &'static str,
    /// Human-readable confirmation
    pub message: &'static str,
    /// Generated output filename
    pub filename: String,
    /// ISO-8601 processing timestamp
    pub timestamp: String,
}

/// Error response with a single client-safe message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
}

/// Saves a submitted JSON payload to the output directory.
///
/// Runs the single-pass pipeline: parse, validate, sanitize identifiers,
/// stamp with one captured timestamp, persist. Every step short-circuits
/// to a JSON error response.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Malformed JSON, non-object payload, payload over 1 MiB, or a
///   target path escaping the output directory
/// - 500: Filesystem or internal errors
#[instrument(
    name = "save_submission",
    skip(state, body),
    fields(content_length = body.len())
)]
pub async fn save_submission(State(state): State<AppState>, body: Bytes) -> Response {
    match process_submission(&state, &body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => create_error_response(&e),
    }
}

/// Runs the ingest pipeline for one request body.
async fn process_submission(state: &AppState, body: &[u8]) -> Result<SaveResponse, IngestError> {
    let value = parse_json(body)?;
    let submission = Submission::from_value(value)?;

    // One timestamp capture drives both the metadata field and the
    // filename stamp.
    let received_at = state.clock.now_utc();
    let record = submission.into_record(received_at);

    let path = state.store.persist(&record).await?;

    info!(
        user_id = %record.user_id(),
        session_id = %record.session_id(),
        path = %path.display(),
        "submission saved"
    );

    Ok(SaveResponse {
        status: "success",
        message: "Data saved successfully",
        filename: record.filename().to_string(),
        timestamp: record.saved_at().to_string(),
    })
}

/// Creates a standardized error response.
///
/// Client-correctable rejections log at warn level and map to 400;
/// everything else logs at error level and maps to 500.
fn create_error_response(error: &IngestError) -> Response {
    let status = if error.is_client_error() {
        warn!(kind = error.kind(), error = %error, "submission rejected");
        StatusCode::BAD_REQUEST
    } else {
        error!(kind = error.kind(), error = %error, "submission failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}
