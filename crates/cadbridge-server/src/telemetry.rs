//! Tracing bootstrap for the embedded bridge.
//!
//! The bridge runs inside another application's process, so it never owns
//! logging outright: when the host has already registered a subscriber the
//! bridge leaves it in place and emits through it. Otherwise the first
//! start installs one, writing to whichever destination the host glue
//! supplies (stderr when it supplies none).

use std::io;

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use cadbridge_config::{BridgeConfig, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that telemetry setup ran for this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter is not a valid set of tracing directives.
    #[error("log filter {filter:?} is not a valid directive set: {reason}")]
    InvalidFilter { filter: String, reason: String },
}

/// Sets up tracing output on stderr.
///
/// Safe to call from every bridge start: the first call in the process
/// installs a subscriber, later calls return a handle without touching
/// global state.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured filter
/// expression cannot be parsed.
pub fn initialise(config: &BridgeConfig) -> Result<TelemetryHandle, TelemetryError> {
    initialise_with_writer(config, io::stderr)
}

/// Sets up tracing output on a host-supplied writer, e.g. a console panel
/// or a log file the host rotates.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured filter
/// expression cannot be parsed.
pub fn initialise_with_writer<W>(
    config: &BridgeConfig,
    writer: W,
) -> Result<TelemetryHandle, TelemetryError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    INSTALLED
        .get_or_try_init(|| install(config, writer))
        .map(|_| TelemetryHandle)
}

fn install<W>(config: &BridgeConfig, writer: W) -> Result<(), TelemetryError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = parse_filter(&config.log_filter)?;
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339());
    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format {
        LogFormat::Json => Box::new(base.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(base.compact().finish()),
    };
    // Registration fails only when the host process already installed a
    // subscriber of its own; bridge events then flow through that one.
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|error| TelemetryError::InvalidFilter {
        filter: filter.to_owned(),
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_idempotent() {
        let config = BridgeConfig::default();
        let first = initialise(&config);
        let second = initialise(&config);
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[test]
    fn invalid_filter_reports_the_offending_expression() {
        let config = BridgeConfig {
            log_filter: "no such ===== filter".to_owned(),
            ..BridgeConfig::default()
        };
        let error = install(&config, io::sink).expect_err("filter cannot parse");
        assert!(matches!(
            error,
            TelemetryError::InvalidFilter { ref filter, .. } if filter.contains("=====")
        ));
    }

    #[test]
    fn existing_subscriber_is_left_in_place() {
        let config = BridgeConfig::default();
        initialise(&config).expect("first install");
        // With a global subscriber present, a direct install defers to it
        // instead of erroring.
        install(&config, io::sink).expect("defers to the existing subscriber");
    }
}
