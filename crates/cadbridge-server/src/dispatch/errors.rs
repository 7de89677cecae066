//! Error types raised by command handlers.

use thiserror::Error;

use crate::host::HostError;

/// Failures a handler can report; each becomes an error envelope, never a
/// dropped connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A parameter was present but unusable.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParam {
        name: &'static str,
        message: String,
    },

    /// The host rejected the requested mutation.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The handler's result could not be serialised.
    #[error("failed to serialise handler result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HandlerError {
    /// Creates an invalid-parameter error.
    pub fn invalid_param(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParam {
            name,
            message: message.into(),
        }
    }
}
