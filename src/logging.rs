//! Logging configuration for activity-query.
//!
//! Query output owns stdout, so diagnostics always go to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Initializes logging to stderr.
///
/// Honors `RUST_LOG`; falls back to `warn` so a normal run prints nothing
/// but the query results.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the env filter, falling back to the default level.
fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
