//! Tracing subscriber setup for applications embedding the service

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "warn,modconf_core=info,modconf_meta=info";

/// Initialize a tracing subscriber with default configuration.
///
/// Logs are printed in compact format. The `RUST_LOG` environment variable
/// selects the levels, falling back to [`DEFAULT_FILTER`].
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with_filter(DEFAULT_FILTER)
}

/// Initialize a tracing subscriber, using `default_filter` when `RUST_LOG` is not set.
pub fn init_with_filter(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
