//! Core domain logic for the social RL data server.
//!
//! Provides payload parsing and validation, identifier sanitization, file
//! persistence, and the error taxonomy shared by the HTTP layer. This
//! crate is HTTP-free; the `srl-api` crate maps its results onto status
//! codes and response bodies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod sanitize;
pub mod storage;
pub mod submission;
pub mod time;

pub use error::{IngestError, Result};
pub use sanitize::SanitizedId;
pub use storage::SubmissionStore;
pub use submission::{parse_json, Submission, SubmissionRecord, MAX_PAYLOAD_BYTES};
pub use time::{Clock, SystemClock, TestClock};
