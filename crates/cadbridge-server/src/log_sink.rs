//! Append-only operational log surfaced to the host UI.
//!
//! The host binds the sink to whatever display it has (a panel, an output
//! parameter); the bridge only depends on the append capability. This is
//! separate from `tracing`, which carries the structured telemetry.

use std::sync::Mutex;

use tracing::info;

/// Append-only sink for human-readable status lines.
pub trait LogSink: Send + Sync {
    /// Appends one line to the sink.
    fn append(&self, line: String);
}

/// In-process sink backed by a vector; the host UI polls `snapshot`.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the accumulated lines.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, line: String) {
        info!(target: concat!(env!("CARGO_PKG_NAME"), "::log"), "{line}");
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}
