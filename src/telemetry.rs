//! Tracing subscriber setup driven by [`LoggingConfig`]

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// `RUST_LOG` wins over the configured level when it is set and parses.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => return Err(anyhow!("Unknown log format '{other}'")),
    };

    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
