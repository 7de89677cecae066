//! Command dispatch: registry lookup and transactional execution.
//!
//! The registry is a read-only name-to-handler map populated before the
//! server starts; the executor wraps one command's lifecycle — lookup, undo
//! transaction, handler invocation, envelope construction — and guarantees
//! that no failure below it reaches the network as anything other than a
//! well-formed envelope.

mod errors;
mod executor;
mod handlers;
mod registry;

pub use errors::HandlerError;
pub use executor::CommandExecutor;
pub use registry::{CommandHandler, CommandRegistry};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
