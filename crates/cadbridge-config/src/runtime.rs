//! Runtime configuration consumed by the bridge server and client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_log_filter_string, default_log_format, default_max_frame_bytes, default_poll_interval,
    default_socket_endpoint,
};
use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Settings the host hands to the bridge when constructing the server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Endpoint the listener binds to.
    pub endpoint: SocketEndpoint,
    /// Output format for the telemetry subscriber.
    pub log_format: LogFormat,
    /// `EnvFilter` expression for the telemetry subscriber.
    pub log_filter: String,
    /// Cap on a single accumulated request frame.
    pub max_frame_bytes: usize,
    /// Interval at which the connection loops re-check the running flag.
    #[serde(with = "poll_interval_millis")]
    pub poll_interval: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_socket_endpoint(),
            log_format: default_log_format(),
            log_filter: default_log_filter_string(),
            max_frame_bytes: default_max_frame_bytes(),
            poll_interval: default_poll_interval(),
        }
    }
}

mod poll_interval_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
