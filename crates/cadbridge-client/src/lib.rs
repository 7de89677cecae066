//! Agent-side connection to the command bridge.
//!
//! One client drives one TCP connection, sending commands sequentially and
//! blocking on each response. Responses are recovered the same way the
//! server frames requests: accumulate bytes until a complete JSON value
//! parses, bounded by a response deadline.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use cadbridge_config::SocketEndpoint;
use cadbridge_protocol::{CommandRequest, Envelope, FrameBuffer, FrameError};

const CLIENT_TARGET: &str = env!("CARGO_PKG_NAME");

/// Default wait for a complete response envelope.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(15);

/// Cap on an accumulated response frame.
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Errors surfaced by the bridge client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting to the bridge failed.
    #[error("failed to connect to bridge at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    /// The connection failed mid-exchange.
    #[error("bridge connection failed: {0}")]
    Io(#[from] std::io::Error),
    /// The bridge closed the connection before a full response arrived.
    #[error("bridge closed the connection before responding")]
    Closed,
    /// No complete response arrived within the deadline.
    #[error("timed out waiting for a bridge response")]
    Timeout,
    /// The response bytes can never parse as an envelope.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// The bridge reported a command failure.
    #[error("bridge command failed: {message}")]
    Command { message: String },
}

/// Synchronous connection to a running bridge server.
#[derive(Debug)]
pub struct BridgeClient {
    stream: TcpStream,
    buffer: FrameBuffer,
    response_timeout: Duration,
}

impl BridgeClient {
    /// Connects to the configured bridge endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] when the endpoint is unreachable.
    pub fn connect(endpoint: &SocketEndpoint) -> Result<Self, ClientError> {
        Self::connect_to((endpoint.host.as_str(), endpoint.port), endpoint.to_string())
    }

    /// Connects to an explicit address, e.g. one with an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] when the address is unreachable.
    pub fn connect_addr(addr: SocketAddr) -> Result<Self, ClientError> {
        Self::connect_to(addr, addr.to_string())
    }

    fn connect_to(addr: impl ToSocketAddrs, endpoint: String) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).map_err(|source| ClientError::Connect {
            endpoint: endpoint.clone(),
            source,
        })?;
        debug!(target: CLIENT_TARGET, %endpoint, "connected to bridge");
        Ok(Self {
            stream,
            buffer: FrameBuffer::new(MAX_RESPONSE_BYTES),
            response_timeout: RESPONSE_TIMEOUT,
        })
    }

    /// Replaces the default 15 s response deadline.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sends one command and blocks until its envelope arrives.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on connection failure, response timeout, or
    /// an unparseable response.
    pub fn send(
        &mut self,
        command: &str,
        params: Map<String, Value>,
    ) -> Result<Envelope, ClientError> {
        self.send_request(&CommandRequest::new(command, params))
    }

    /// Sends a prebuilt request and blocks until its envelope arrives.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on connection failure, response timeout, or
    /// an unparseable response.
    pub fn send_request(&mut self, request: &CommandRequest) -> Result<Envelope, ClientError> {
        let payload = serde_json::to_vec(request).map_err(|error| {
            FrameError::Malformed { source: error }
        })?;
        debug!(target: CLIENT_TARGET, command = request.command(), "sending command");
        self.stream.write_all(&payload)?;
        self.stream.flush()?;
        self.receive()
    }

    /// Sends one command and unwraps the success result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Command`] when the bridge answers with an error
    /// envelope, or any transport-level [`ClientError`].
    pub fn call(&mut self, command: &str, params: Map<String, Value>) -> Result<Value, ClientError> {
        match self.send(command, params)? {
            Envelope::Success { result } => Ok(result),
            Envelope::Error { message } => Err(ClientError::Command { message }),
        }
    }

    fn receive(&mut self) -> Result<Envelope, ClientError> {
        let deadline = Instant::now() + self.response_timeout;
        let mut chunk = [0_u8; 8192];
        loop {
            if let Some(envelope) = self.buffer.decode::<Envelope>()? {
                return Ok(envelope);
            }
            // `set_read_timeout` rejects a zero duration, so an expired
            // deadline must short-circuit first.
            let Some(remaining) = remaining_until(deadline) else {
                return Err(ClientError::Timeout);
            };
            self.stream.set_read_timeout(Some(remaining))?;
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ClientError::Closed),
                Ok(read) => self.buffer.extend(&chunk[..read])?,
                Err(error) if is_read_timeout(&error) => return Err(ClientError::Timeout),
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error.into()),
            }
        }
    }
}

fn remaining_until(deadline: Instant) -> Option<Duration> {
    let remaining = deadline.checked_duration_since(Instant::now())?;
    (!remaining.is_zero()).then_some(remaining)
}

fn is_read_timeout(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
