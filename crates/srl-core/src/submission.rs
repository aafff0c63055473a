//! Submission payload model and validation.
//!
//! A submission is an arbitrary JSON object received over HTTP. Validation
//! happens before any filesystem interaction: the body must parse, the
//! value must be an object, and its serialized form must stay within the
//! payload limit. Accepted submissions are turned into a
//! [`SubmissionRecord`] carrying the generated filename and the metadata
//! keys appended before persistence.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::{
    error::{IngestError, Result},
    sanitize::SanitizedId,
};

/// Maximum serialized payload size in bytes (1 MiB).
pub const MAX_PAYLOAD_BYTES: usize = 1_048_576;

/// Strftime format for the filename timestamp component.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Parses a request body into a JSON value.
///
/// # Errors
///
/// Returns `MalformedJson` if the body is empty, fails to parse, or
/// parses to JSON `null`.
pub fn parse_json(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(IngestError::MalformedJson);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| IngestError::MalformedJson)?;

    if value.is_null() {
        return Err(IngestError::MalformedJson);
    }

    Ok(value)
}

/// An accepted submission payload.
///
/// Construction via [`Submission::from_value`] enforces the shape and size
/// rules, so holding a `Submission` means the payload itself is valid.
#[derive(Debug, Clone)]
pub struct Submission {
    fields: Map<String, Value>,
}

impl Submission {
    /// Validates a parsed JSON value as a submission payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if the value is not a JSON object, or
    /// `TooLarge` if its serialized form exceeds [`MAX_PAYLOAD_BYTES`].
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(IngestError::InvalidShape);
        };

        let size_bytes =
            serde_json::to_vec(&fields).map_err(|_| IngestError::Internal)?.len();
        if size_bytes > MAX_PAYLOAD_BYTES {
            return Err(IngestError::TooLarge { size_bytes });
        }

        Ok(Self { fields })
    }

    /// Returns the sanitized `userId` component.
    pub fn user_id(&self) -> SanitizedId {
        SanitizedId::from_value(self.fields.get("userId"))
    }

    /// Returns the sanitized `sessionId` component.
    pub fn session_id(&self) -> SanitizedId {
        SanitizedId::from_value(self.fields.get("sessionId"))
    }

    /// Builds the persistable record, stamping it with `received_at`.
    ///
    /// The single captured timestamp drives both the ISO-8601 `saved_at`
    /// metadata and the filename's date/time component, so the two never
    /// disagree across a clock tick. Exactly four metadata keys are
    /// appended: `saved_at`, `filename`, `sanitized_user_id`, and
    /// `sanitized_session_id`. A payload already carrying one of these
    /// keys has it overwritten.
    pub fn into_record(self, received_at: DateTime<Utc>) -> SubmissionRecord {
        let user_id = self.user_id();
        let session_id = self.session_id();

        let saved_at = received_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        let stamp = received_at.format(FILENAME_TIMESTAMP_FORMAT);
        let filename = format!("{user_id}_session_{session_id}_{stamp}.json");

        let mut fields = self.fields;
        fields.insert("saved_at".to_string(), Value::String(saved_at.clone()));
        fields.insert("filename".to_string(), Value::String(filename.clone()));
        fields.insert("sanitized_user_id".to_string(), Value::String(user_id.to_string()));
        fields.insert("sanitized_session_id".to_string(), Value::String(session_id.to_string()));

        SubmissionRecord { filename, saved_at, user_id, session_id, fields }
    }
}

/// A submission ready to be written to disk.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    filename: String,
    saved_at: String,
    user_id: SanitizedId,
    session_id: SanitizedId,
    fields: Map<String, Value>,
}

impl SubmissionRecord {
    /// Returns the generated output filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the ISO-8601 processing timestamp.
    pub fn saved_at(&self) -> &str {
        &self.saved_at
    }

    /// Returns the sanitized user identifier.
    pub fn user_id(&self) -> &SanitizedId {
        &self.user_id
    }

    /// Returns the sanitized session identifier.
    pub fn session_id(&self) -> &SanitizedId {
        &self.session_id
    }

    /// Serializes the record as 2-space-indented JSON.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.fields).map_err(|_| IngestError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap()
    }

    #[test]
    fn parse_rejects_empty_body() {
        assert!(matches!(parse_json(b""), Err(IngestError::MalformedJson)));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(parse_json(b"{not json"), Err(IngestError::MalformedJson)));
        assert!(matches!(parse_json(b"\"unterminated"), Err(IngestError::MalformedJson)));
    }

    #[test]
    fn parse_rejects_json_null() {
        assert!(matches!(parse_json(b"null"), Err(IngestError::MalformedJson)));
    }

    #[test]
    fn parse_accepts_valid_json() {
        let value = parse_json(br#"{"userId": "alice"}"#).expect("valid body");
        assert_eq!(value["userId"], "alice");
    }

    #[test]
    fn non_object_values_rejected() {
        assert!(matches!(
            Submission::from_value(json!(["a", "b"])),
            Err(IngestError::InvalidShape)
        ));
        assert!(matches!(Submission::from_value(json!("text")), Err(IngestError::InvalidShape)));
        assert!(matches!(Submission::from_value(json!(42)), Err(IngestError::InvalidShape)));
        assert!(matches!(Submission::from_value(json!(true)), Err(IngestError::InvalidShape)));
    }

    #[test]
    fn oversized_payload_rejected_with_size() {
        let value = json!({ "blob": "x".repeat(MAX_PAYLOAD_BYTES) });

        match Submission::from_value(value) {
            Err(IngestError::TooLarge { size_bytes }) => assert!(size_bytes > MAX_PAYLOAD_BYTES),
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn payload_at_limit_accepted() {
        // {"blob":"…"} wraps the value in 11 bytes of structure.
        let value = json!({ "blob": "x".repeat(MAX_PAYLOAD_BYTES - 11) });
        assert!(Submission::from_value(value).is_ok());
    }

    #[test]
    fn identifiers_extracted_and_sanitized() {
        let submission =
            Submission::from_value(json!({ "userId": "alice/../x", "sessionId": 42 }))
                .expect("valid submission");

        assert_eq!(submission.user_id().as_str(), "alice_.._x");
        assert_eq!(submission.session_id().as_str(), "42");
    }

    #[test]
    fn missing_identifiers_default_to_unknown() {
        let submission = Submission::from_value(json!({ "score": 10 })).expect("valid submission");

        assert_eq!(submission.user_id().as_str(), "unknown");
        assert_eq!(submission.session_id().as_str(), "unknown");
    }

    #[test]
    fn record_filename_follows_pattern() {
        let submission =
            Submission::from_value(json!({ "userId": "alice", "sessionId": "s1" }))
                .expect("valid submission");

        let record = submission.into_record(sample_time());

        assert_eq!(record.filename(), "alice_session_s1_20240301_143005.json");
    }

    #[test]
    fn record_timestamps_derive_from_one_capture() {
        let submission = Submission::from_value(json!({})).expect("valid submission");
        let record = submission.into_record(sample_time());

        assert_eq!(record.saved_at(), "2024-03-01T14:30:05.000000Z");
        assert!(record.filename().ends_with("_20240301_143005.json"));
    }

    #[test]
    fn record_appends_exactly_four_keys() {
        let submission =
            Submission::from_value(json!({ "userId": "alice", "score": 10 }))
                .expect("valid submission");

        let record = submission.into_record(sample_time());
        let bytes = record.to_pretty_json().expect("serializable record");
        let stored: Value = serde_json::from_slice(&bytes).expect("stored JSON parses");
        let stored = stored.as_object().expect("stored JSON is an object");

        // Original keys survive untouched.
        assert_eq!(stored["userId"], "alice");
        assert_eq!(stored["score"], 10);

        // Plus the four metadata keys, nothing else.
        assert_eq!(stored.len(), 6);
        assert_eq!(stored["filename"].as_str(), Some(record.filename()));
        assert_eq!(stored["saved_at"].as_str(), Some(record.saved_at()));
        assert_eq!(stored["sanitized_user_id"], "alice");
        assert_eq!(stored["sanitized_session_id"], "unknown");
    }

    #[test]
    fn metadata_keys_in_payload_are_overwritten() {
        let submission = Submission::from_value(json!({ "saved_at": "forged" }))
            .expect("valid submission");

        let record = submission.into_record(sample_time());
        let bytes = record.to_pretty_json().expect("serializable record");
        let stored: Value = serde_json::from_slice(&bytes).expect("stored JSON parses");

        assert_eq!(stored["saved_at"], "2024-03-01T14:30:05.000000Z");
        assert_eq!(stored.as_object().map(serde_json::Map::len), Some(4));
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let submission = Submission::from_value(json!({ "a": 1 })).expect("valid submission");
        let record = submission.into_record(sample_time());

        let text = String::from_utf8(record.to_pretty_json().expect("serializable record"))
            .expect("utf8 output");

        assert!(text.starts_with("{\n  \""));
    }
}
