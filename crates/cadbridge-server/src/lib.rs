//! Command bridge between an external agent and a single-threaded host.
//!
//! The bridge accepts TCP connections from a local agent, recovers discrete
//! JSON commands from each byte stream, and executes them against the host
//! document. The host is a visual-programming document editor that only
//! permits mutation from one designated thread, so every command is marshaled
//! onto a single mutation worker and runs inside an undo transaction; network
//! I/O stays concurrent on per-connection threads.
//!
//! The host's UI glue owns one [`BridgeServer`] per embedded server instance
//! and drives it through `start`/`stop`/`is_running`. Operational events are
//! appended to a [`LogSink`] the UI can display, in addition to the
//! structured `tracing` output configured via [`telemetry`].

pub mod dispatch;
pub mod host;
mod log_sink;
mod server;
pub mod telemetry;
mod transport;

pub use log_sink::{LogSink, MemoryLogSink};
pub use server::{BridgeServer, ServerError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;
