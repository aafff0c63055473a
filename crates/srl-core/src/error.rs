//! Error types and result handling for submission processing.
//!
//! Defines the structured error taxonomy covering request validation,
//! path containment, and storage failures, with classification helpers
//! used for HTTP status mapping and log-level selection at the handler
//! boundary.

use thiserror::Error;

/// Result type alias using `IngestError`.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while accepting and persisting a submission.
///
/// Display strings are safe to return to clients: validation variants
/// describe the client-correctable problem, while filesystem variants stay
/// deliberately generic. Underlying I/O detail is logged server-side at the
/// point of failure and never carried in a variant.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request body was empty, unparseable, or JSON `null`.
    #[error("Request body must be valid JSON")]
    MalformedJson,

    /// Parsed payload is not a JSON object.
    #[error("Payload must be a JSON object")]
    InvalidShape,

    /// Serialized payload exceeds the 1 MiB limit.
    #[error("Payload too large: {size_bytes} bytes exceeds 1MiB limit")]
    TooLarge {
        /// Serialized size of the payload in bytes
        size_bytes: usize,
    },

    /// Target file path resolved outside the output directory.
    #[error("Target path escapes the output directory")]
    PathEscape,

    /// Filesystem refused the write due to permissions.
    #[error("Permission denied while saving data")]
    PermissionDenied,

    /// Any other I/O failure while writing the submission.
    #[error("Failed to save data")]
    StorageFailure,

    /// Unanticipated internal failure.
    #[error("Internal server error")]
    Internal,
}

impl IngestError {
    /// Returns a stable class name for structured logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson => "malformed_json",
            Self::InvalidShape => "invalid_shape",
            Self::TooLarge { .. } => "too_large",
            Self::PathEscape => "path_escape",
            Self::PermissionDenied => "permission_denied",
            Self::StorageFailure => "storage_failure",
            Self::Internal => "internal",
        }
    }

    /// Returns whether the error describes a client-correctable request.
    ///
    /// Client errors map to HTTP 400 and log at warn level; everything else
    /// maps to HTTP 500 and logs at error level.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedJson | Self::InvalidShape | Self::TooLarge { .. } | Self::PathEscape
        )
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::StorageFailure,
        }
    }
}
