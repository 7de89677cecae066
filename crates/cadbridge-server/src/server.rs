//! Server lifecycle controller: the surface the host's UI glue drives.

use std::net::SocketAddr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;
use tracing::{info, warn};

use cadbridge_config::BridgeConfig;

use crate::dispatch::{CommandExecutor, CommandRegistry};
use crate::host::{HostDocument, MutationThread};
use crate::log_sink::LogSink;
use crate::transport::{BridgeConnectionHandler, ListenerError, ListenerHandle, SocketListener};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Errors surfaced by [`BridgeServer::start`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or running the listener failed; the server remains stopped.
    #[error(transparent)]
    Listener(#[from] ListenerError),
    /// The lifecycle lock was poisoned by a panicking thread.
    #[error("server state lock poisoned")]
    Poisoned,
}

#[derive(Default)]
struct ServerState {
    listener: Option<ListenerHandle>,
    running: Option<Arc<AtomicBool>>,
    local_addr: Option<SocketAddr>,
}

/// Start/stop/is-running state machine around the listener.
///
/// `start` and `stop` are idempotent; `is_running` is safe from any thread.
/// The mutation worker outlives start/stop cycles so in-flight commands keep
/// their document while the listener restarts.
pub struct BridgeServer {
    config: BridgeConfig,
    executor: Arc<CommandExecutor>,
    log: Arc<dyn LogSink>,
    state: Mutex<ServerState>,
}

impl BridgeServer {
    /// Builds a server over the host document with the built-in handlers.
    #[must_use]
    pub fn new(config: BridgeConfig, document: Box<dyn HostDocument>, log: Arc<dyn LogSink>) -> Self {
        Self::with_registry(config, CommandRegistry::with_builtins(), document, log)
    }

    /// Builds a server with a caller-assembled handler registry.
    #[must_use]
    pub fn with_registry(
        config: BridgeConfig,
        registry: CommandRegistry,
        document: Box<dyn HostDocument>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        let mutation = MutationThread::spawn(document);
        let executor = Arc::new(CommandExecutor::new(registry, mutation, Arc::clone(&log)));
        Self {
            config,
            executor,
            log,
            state: Mutex::new(ServerState::default()),
        }
    }

    /// Binds the endpoint and starts accepting connections.
    ///
    /// Calling `start` while running logs a notice and succeeds without
    /// binding a second socket. Any bind failure leaves the server stopped.
    ///
    /// # Errors
    ///
    /// Returns a [`ServerError`] when binding or starting the listener fails.
    pub fn start(&self) -> Result<(), ServerError> {
        let mut state = self.state.lock().map_err(|_| ServerError::Poisoned)?;
        if state.listener.is_some() {
            info!(target: SERVER_TARGET, "start ignored: server already running");
            self.log.append("Server is already running".to_string());
            return Ok(());
        }

        let listener = SocketListener::bind(&self.config.endpoint).inspect_err(|error| {
            warn!(target: SERVER_TARGET, %error, "failed to start server");
            self.log.append(format!("Failed to start server: {error}"));
        })?;
        let local_addr = listener.local_addr();

        let running = Arc::new(AtomicBool::new(true));
        let handler = Arc::new(BridgeConnectionHandler::new(
            Arc::clone(&self.executor),
            Arc::clone(&running),
            Arc::clone(&self.log),
            self.config.max_frame_bytes,
            self.config.poll_interval,
        ));
        let handle = listener.start(handler).inspect_err(|error| {
            warn!(target: SERVER_TARGET, %error, "failed to start server");
            self.log.append(format!("Failed to start server: {error}"));
        })?;

        state.listener = Some(handle);
        state.running = Some(running);
        state.local_addr = local_addr;
        drop(state);

        info!(target: SERVER_TARGET, endpoint = %self.config.endpoint, "bridge server started");
        self.log
            .append(format!("Bridge server started on {}", self.config.endpoint));
        Ok(())
    }

    /// Stops accepting connections and lets open connections drain.
    ///
    /// Connection loops observe the cleared running flag within one poll
    /// interval. Calling `stop` while stopped is a no-op.
    pub fn stop(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let Some(handle) = state.listener.take() else {
            return;
        };
        if let Some(running) = state.running.take() {
            running.store(false, Ordering::SeqCst);
        }
        state.local_addr = None;
        drop(state);

        handle.shutdown();
        if let Err(error) = handle.join() {
            warn!(target: SERVER_TARGET, %error, "listener did not stop cleanly");
        }
        info!(target: SERVER_TARGET, "bridge server stopped");
        self.log.append("Bridge server stopped".to_string());
    }

    /// True while the listener is accepting connections.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.listener.is_some())
            .unwrap_or(false)
    }

    /// Address the listener actually bound to, while running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.state.lock().ok().and_then(|state| state.local_addr)
    }
}

impl Drop for BridgeServer {
    fn drop(&mut self) {
        self.stop();
    }
}
