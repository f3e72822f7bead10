//! Logging setup for the shell.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,groundwater_map_plugin=debug";

/// Log to stderr, filtered by `RUST_LOG` when set.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
