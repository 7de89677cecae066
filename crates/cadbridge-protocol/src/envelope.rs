//! Response envelope shared by the server and the agent-side client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform success/error wrapper returned for every command.
///
/// Every command produces exactly one envelope; the agent never sees a raw
/// error or a connection dropped without one being attempted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope {
    /// The handler ran to completion; `result` carries its return value.
    Success { result: Value },
    /// Lookup, framing, or handler failure; `message` is human-readable.
    Error { message: String },
}

impl Envelope {
    /// Wraps a handler result in a success envelope.
    #[must_use]
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    /// Wraps an error message in an error envelope.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true for the success variant.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serialises_with_status_tag() {
        let envelope = Envelope::success(json!({"id": "abc"}));
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""status":"success""#));
        assert!(json.contains(r#""result""#));
        assert!(!json.contains("message"));
    }

    #[test]
    fn error_serialises_with_message_only() {
        let envelope = Envelope::error("Unknown command type: bogus");
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains("Unknown command type: bogus"));
        assert!(!json.contains("result"));
    }

    #[test]
    fn deserialises_both_shapes() {
        let success: Envelope =
            serde_json::from_str(r#"{"status":"success","result":{}}"#).unwrap();
        assert!(success.is_success());
        let error: Envelope =
            serde_json::from_str(r#"{"status":"error","message":"boom"}"#).unwrap();
        assert!(!error.is_success());
    }
}
