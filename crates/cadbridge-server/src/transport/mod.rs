//! Socket listener and per-connection framing loop.
//!
//! The transport binds the configured TCP endpoint, accepts connections on a
//! background thread, and runs one connection loop per accepted socket.

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{BridgeConnectionHandler, ConnectionHandler};
pub(crate) use self::listener::{ListenerHandle, SocketListener};

pub(crate) const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
