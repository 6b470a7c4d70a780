//! # Launch Quoter Configuration
//!
//! Layered configuration for the bonding-curve quoter: a base TOML file,
//! an optional `environments/<name>.toml` overlay and `LAUNCH_` environment
//! variables, deserialized into typed sections with defaults.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use launch_config::QuoterConfig;
//! use std::path::Path;
//!
//! let config = QuoterConfig::load(Some(Path::new("config/quoter.toml")), Some("production"))?;
//! let fee = config.engine.fee_rate();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Nested keys are overridden with a double underscore:
//! `LAUNCH_ENGINE__PROTOCOL_FEE_BPS=50`.

pub mod defaults;
pub mod quoter_config;

// Re-export commonly used types
pub use quoter_config::{load_config, GlobalConfig, LogFormat, QuoteDefaults, QuoterConfig};
