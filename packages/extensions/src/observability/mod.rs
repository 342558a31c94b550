// packages/extensions/src/observability/mod.rs
//! Logging and metrics setup
//!
//! The library only emits through the `tracing` and `metrics` facades. Binaries
//! call [`init_tracing`] once, and may install a metrics recorder of their
//! choice before calling [`init_metrics`].

use crate::utils::config::LoggingConfig;
use crate::utils::errors::{ExtensionError, Result};
use tracing_subscriber::EnvFilter;

/// Events accepted by a recorder sink
pub const EVENTS_RECORDED: &str = "recorder_events_recorded_total";

/// Events dropped because the recorder was inactive or full
pub const EVENTS_DROPPED: &str = "recorder_events_dropped_total";

/// Events stored with a shortened string or fewer scalar fields
pub const EVENTS_TRUNCATED: &str = "recorder_events_truncated_total";

/// Install the global `tracing` subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ExtensionError::Observability(format!("bad log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ExtensionError::Observability(e.to_string()))
}

/// Describe the counters emitted by the reference recorder
pub fn init_metrics() -> Result<()> {
    metrics::describe_counter!(EVENTS_RECORDED, "Trace events accepted by the recorder sink");
    metrics::describe_counter!(
        EVENTS_DROPPED,
        "Trace events dropped because the recorder was inactive or full"
    );
    metrics::describe_counter!(
        EVENTS_TRUNCATED,
        "Trace events whose string or scalar fields were truncated"
    );
    Ok(())
}
