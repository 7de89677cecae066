//! Declarative configuration shared by the bridge server and client.
//!
//! The bridge is embedded in a host application, so configuration is a plain
//! value the host constructs (or deserialises) and hands to the server; there
//! is no file or environment layering here.

mod defaults;
mod logging;
mod runtime;
mod socket;

pub use defaults::{DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT};
pub use logging::{LogFormat, LogFormatParseError};
pub use runtime::BridgeConfig;
pub use socket::{SocketEndpoint, SocketParseError};
