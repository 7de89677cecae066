//! Request deserialization for the command bridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Parsed command request from an agent.
///
/// The `type` field selects a handler; `params` is opaque to the bridge core
/// and forwarded to the handler verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandRequest {
    /// Handler name, e.g. `create_slider`.
    #[serde(rename = "type")]
    pub command: String,
    /// Handler parameters, forwarded untouched.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl CommandRequest {
    /// Builds a request from a handler name and parameter object.
    #[must_use]
    pub fn new(command: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }

    /// Validates that the command name is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::EmptyCommand`] when the `type` field is empty
    /// or contains only whitespace.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.command.trim().is_empty() {
            return Err(RequestError::EmptyCommand);
        }
        Ok(())
    }

    /// Returns the normalised command name (trimmed).
    #[must_use]
    pub fn command(&self) -> &str {
        self.command.trim()
    }
}

/// Errors surfaced while validating a parsed request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The `type` field was empty.
    #[error("command type field is empty")]
    EmptyCommand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_without_params() {
        let request: CommandRequest = serde_json::from_str(r#"{"type":"bogus"}"#).unwrap();
        assert_eq!(request.command(), "bogus");
        assert!(request.params.is_empty());
        request.validate().expect("bare command should validate");
    }

    #[test]
    fn parses_request_with_params() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"type":"create_slider","params":{"x":10.0}}"#).unwrap();
        assert_eq!(request.command(), "create_slider");
        assert_eq!(request.params.get("x"), Some(&serde_json::json!(10.0)));
    }

    #[test]
    fn rejects_blank_command_name() {
        let request: CommandRequest = serde_json::from_str(r#"{"type":"  "}"#).unwrap();
        assert_eq!(request.validate(), Err(RequestError::EmptyCommand));
    }
}
