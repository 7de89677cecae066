use std::time::Duration;

use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Default loopback host the bridge binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port the bridge listens on.
pub const DEFAULT_PORT: u16 = 2000;

/// Default log filter expression for the telemetry subscriber.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for an embedded server.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Computes the default endpoint for the bridge listener.
pub fn default_socket_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp(DEFAULT_HOST, DEFAULT_PORT)
}

/// Cap on a single accumulated request or response frame.
pub fn default_max_frame_bytes() -> usize {
    1024 * 1024
}

/// Interval at which connection loops re-check the running flag.
pub fn default_poll_interval() -> Duration {
    Duration::from_millis(50)
}
