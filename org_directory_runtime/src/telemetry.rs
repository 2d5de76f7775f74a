//! Tracing setup for the console and embedding hosts.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Returns `false` when a
/// subscriber was already installed (e.g. by the embedding host).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}
