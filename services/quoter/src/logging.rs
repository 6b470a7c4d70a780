//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level so a single run can be made
//! verbose without editing config files. Logs go to stderr; stdout carries
//! only the quote JSON.

use anyhow::{Context, Result};
use launch_config::{GlobalConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the configured directive
pub fn build_filter(global: &GlobalConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&global.log_level)
            .with_context(|| format!("Invalid log level directive '{}'", global.log_level)),
    }
}

/// Install the global subscriber
pub fn init(global: &GlobalConfig) -> Result<()> {
    let filter = build_filter(global)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match global.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
