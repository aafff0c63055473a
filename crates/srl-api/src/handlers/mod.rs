//! HTTP request handlers for the social RL data server.
//!
//! Handlers follow a consistent pattern:
//! - Input validation with the shared error taxonomy
//! - Tracing for observability
//! - Standardized JSON error responses
//!
//! # Handler Organization
//!
//! - `ingest` - Submission save endpoint
//! - `health` - Health check endpoint
//!
//! # Error Handling
//!
//! All failures are converted to `{"error": <message>}` bodies at the
//! handler boundary. Client-correctable problems map to 400 with specific
//! messages; filesystem and internal failures map to 500 with generic
//! messages, with full detail in server logs only.

pub mod health;
pub mod ingest;

// Re-export handlers for convenient access
pub use health::health_check;
pub use ingest::save_submission;
