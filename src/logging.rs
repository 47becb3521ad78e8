//! Tracing setup shared by the CLI binary and tests.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging with sensible defaults.
///
/// Default level is WARN so JSON output stays clean on stdout; override
/// with the RUST_LOG environment variable.
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with a specific default level, still overridable
/// by RUST_LOG.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
