//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install a global `tracing` subscriber at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns `false` if a subscriber was
/// already installed.
pub fn init(level: LogLevel) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter())),
        )
        .try_init()
        .is_ok()
}
