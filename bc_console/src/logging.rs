//! Structured logging configuration.
//!
//! The clock library logs through the `log` facade; the subscriber installed
//! here bridges those records into `tracing` so both end up on stderr.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,bc_console=info";

/// Initialize logging to stderr, configured by `RUST_LOG`
///
/// Stdout stays reserved for the clock display.
///
/// # Example
///
/// ```no_run
/// use bc_console::logging;
///
/// logging::init();
/// tracing::info!("Console starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}

/// Log a rejected operator command
pub fn log_ignored(command: &str, reason: &str) {
    tracing::debug!(command = command, reason = reason, "Command ignored");
}
