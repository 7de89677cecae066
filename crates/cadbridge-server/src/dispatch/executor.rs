//! Transactional execution of a single command.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cadbridge_protocol::{CommandRequest, Envelope};
use tracing::{debug, warn};

use crate::host::{MutationThread, UndoScope};
use crate::log_sink::LogSink;

use super::DISPATCH_TARGET;
use super::registry::CommandRegistry;

/// Label attached to the undo record opened for every command.
const UNDO_LABEL: &str = "bridge command";

/// Wraps one command's lifecycle: registry lookup, mutation-thread marshal,
/// undo transaction, handler invocation, envelope construction.
///
/// `execute` is infallible by contract — every failure mode, including a
/// panicking handler, is converted into an error envelope.
pub struct CommandExecutor {
    registry: CommandRegistry,
    mutation: MutationThread,
    log: Arc<dyn LogSink>,
}

impl CommandExecutor {
    /// Builds an executor over a registry and the host's mutation thread.
    #[must_use]
    pub fn new(registry: CommandRegistry, mutation: MutationThread, log: Arc<dyn LogSink>) -> Self {
        Self {
            registry,
            mutation,
            log,
        }
    }

    /// Executes one command and produces exactly one envelope.
    ///
    /// Unknown command types are reported without opening a transaction; for
    /// known types the undo record is opened and closed exactly once on every
    /// exit path.
    pub fn execute(&self, request: &CommandRequest) -> Envelope {
        if request.validate().is_err() {
            return Envelope::error("command type field is empty");
        }
        let name = request.command().to_string();

        let Some(handler) = self.registry.lookup(&name) else {
            warn!(target: DISPATCH_TARGET, command = %name, "unknown command type");
            self.log.append(format!("Unknown command type: {name}"));
            return Envelope::error(format!("Unknown command type: {name}"));
        };

        debug!(target: DISPATCH_TARGET, command = %name, "executing command");
        self.log.append(format!("Executing command: {name}"));

        let params = request.params.clone();
        let outcome = self.mutation.run(move |document| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                let scope = UndoScope::begin(document, UNDO_LABEL);
                let result = handler(document, &params);
                drop(scope);
                result
            }))
        });

        let envelope = match outcome {
            Err(error) => {
                warn!(target: DISPATCH_TARGET, command = %name, %error, "mutation marshal failed");
                Envelope::error(error.to_string())
            }
            Ok(Err(_panic)) => {
                warn!(target: DISPATCH_TARGET, command = %name, "command handler panicked");
                Envelope::error(format!("command '{name}' failed unexpectedly"))
            }
            Ok(Ok(Err(error))) => {
                warn!(target: DISPATCH_TARGET, command = %name, %error, "command handler failed");
                Envelope::error(error.to_string())
            }
            Ok(Ok(Ok(result))) => Envelope::success(result),
        };

        if envelope.is_success() {
            debug!(target: DISPATCH_TARGET, command = %name, "command execution complete");
            self.log.append(format!("Command complete: {name}"));
        } else {
            self.log.append(format!("Command failed: {name}"));
        }
        envelope
    }
}
