//! Logging setup.
//!
//! `RUST_LOG` takes precedence over the configured level, so
//! `RUST_LOG=labelprint::transport=debug` narrows output to one module.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(level: Option<&str>) {
    let level = level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("labelprint={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}
