//! Filename sanitization for user-supplied identifiers.
//!
//! Raw `userId`/`sessionId` values flow straight into generated filenames,
//! so every value is reduced to a filesystem-safe component before it
//! touches a path. Sanitization is pure and deterministic.

use std::fmt;

use serde_json::Value;

/// Fallback component for absent or unusable identifier values.
pub const UNKNOWN_COMPONENT: &str = "unknown";

/// Maximum length of a sanitized component in characters.
pub const MAX_COMPONENT_LEN: usize = 50;

/// A filename-safe identifier component.
///
/// Guaranteed to be non-empty, at most [`MAX_COMPONENT_LEN`] characters,
/// and composed only of `[A-Za-z0-9_.-]` with no leading or trailing `.`.
/// Values that cannot be sanitized become the literal
/// [`UNKNOWN_COMPONENT`].
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use srl_core::SanitizedId;
///
/// let id = SanitizedId::from_value(Some(&json!("../../etc/passwd")));
/// assert!(!id.as_str().contains('/'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedId(String);

impl SanitizedId {
    /// Sanitizes an optional JSON value into a filename-safe component.
    ///
    /// Strings and numbers are converted to their string form; anything
    /// else (absent, null, bool, array, object) becomes
    /// [`UNKNOWN_COMPONENT`]. The string form is truncated to
    /// [`MAX_COMPONENT_LEN`] characters, characters outside `[A-Za-z0-9_.-]`
    /// are replaced with `_`, and leading/trailing `.` and space characters
    /// are stripped. An empty result falls back to [`UNKNOWN_COMPONENT`].
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(raw)) => Self::from_raw(raw),
            Some(Value::Number(n)) => Self::from_raw(&n.to_string()),
            _ => Self::unknown(),
        }
    }

    /// Returns the fallback component.
    pub fn unknown() -> Self {
        Self(UNKNOWN_COMPONENT.to_string())
    }

    /// Returns the sanitized component as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_raw(raw: &str) -> Self {
        let sanitized: String = raw
            .chars()
            .take(MAX_COMPONENT_LEN)
            .map(|c| if is_safe_char(c) { c } else { '_' })
            .collect();

        let trimmed = sanitized.trim_matches(|c| c == '.' || c == ' ');

        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self(trimmed.to_string())
        }
    }
}

impl fmt::Display for SanitizedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
