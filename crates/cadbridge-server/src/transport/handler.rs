//! Per-connection framing and dispatch loop.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use cadbridge_protocol::{CommandRequest, Envelope, FrameBuffer};
use tracing::{debug, warn};

use crate::dispatch::CommandExecutor;
use crate::log_sink::LogSink;

use super::LISTENER_TARGET;

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: TcpStream);
}

/// Connection loop: accumulate bytes, frame JSON commands, dispatch, reply.
///
/// Each connection runs synchronously on its own thread with one command in
/// flight at a time, so responses leave in arrival order. The read timeout
/// doubles as the poll interval for observing the cleared running flag.
pub(crate) struct BridgeConnectionHandler {
    executor: Arc<CommandExecutor>,
    running: Arc<AtomicBool>,
    log: Arc<dyn LogSink>,
    max_frame_bytes: usize,
    poll_interval: Duration,
}

impl BridgeConnectionHandler {
    pub(crate) fn new(
        executor: Arc<CommandExecutor>,
        running: Arc<AtomicBool>,
        log: Arc<dyn LogSink>,
        max_frame_bytes: usize,
        poll_interval: Duration,
    ) -> Self {
        Self {
            executor,
            running,
            log,
            max_frame_bytes,
            poll_interval,
        }
    }

    fn serve(&self, stream: &mut TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(self.poll_interval))?;
        let mut buffer = FrameBuffer::new(self.max_frame_bytes);
        let mut chunk = [0_u8; 8192];

        while self.running.load(Ordering::SeqCst) {
            let bytes_read = match stream.read(&mut chunk) {
                Ok(0) => {
                    debug!(target: LISTENER_TARGET, "client closed the connection");
                    return Ok(());
                }
                Ok(read) => read,
                Err(error) if is_read_timeout(&error) => continue,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };

            if let Err(error) = buffer.extend(&chunk[..bytes_read]) {
                warn!(target: LISTENER_TARGET, %error, "request frame rejected");
                write_envelope(stream, &Envelope::error(error.to_string()))?;
                continue;
            }

            // A single read may complete several pipelined frames.
            loop {
                match buffer.decode::<CommandRequest>() {
                    Ok(Some(request)) => {
                        let envelope = self.executor.execute(&request);
                        write_envelope(stream, &envelope)?;
                    }
                    Ok(None) => break,
                    Err(error) => {
                        warn!(target: LISTENER_TARGET, %error, "malformed request frame");
                        write_envelope(stream, &Envelope::error(error.to_string()))?;
                        break;
                    }
                }
            }
        }
        debug!(target: LISTENER_TARGET, "server stopping, closing connection");
        Ok(())
    }
}

impl ConnectionHandler for BridgeConnectionHandler {
    fn handle(&self, mut stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown".to_string(), |addr| addr.to_string());
        self.log.append(format!("Client connected: {peer}"));

        if let Err(error) = self.serve(&mut stream) {
            warn!(target: LISTENER_TARGET, %error, peer = %peer, "connection failed");
            self.log.append(format!("Connection error ({peer}): {error}"));
        }
        self.log.append(format!("Client disconnected: {peer}"));
    }
}

fn is_read_timeout(error: &io::Error) -> bool {
    // Unix reports a read timeout as WouldBlock, Windows as TimedOut.
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn write_envelope(stream: &mut TcpStream, envelope: &Envelope) -> io::Result<()> {
    let payload = serde_json::to_vec(envelope).map_err(io::Error::other)?;
    stream.write_all(&payload)?;
    stream.flush()
}
