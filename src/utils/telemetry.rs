// src/utils/telemetry.rs
//! Tracing initialization for binaries

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info` when unset. Later
/// calls are no-ops, so tests and binaries may both call this.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
