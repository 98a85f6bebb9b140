//! Host log backend.
//!
//! The library only talks to the `log` facade. The binary routes those
//! records to stderr through `tracing-subscriber`'s fmt layer, which
//! installs the `log` bridge on init.

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global logger. `RUST_LOG` wins over `verbose`.
///
/// Fails if a logger is already installed.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
