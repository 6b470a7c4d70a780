//! Quoter Configuration Module
//!
//! Loads quoter settings from a TOML file, an optional per-environment
//! overlay and `LAUNCH_`-prefixed environment variables, in that order of
//! increasing precedence. Every section has defaults, so a missing base
//! file at the default location is not an error.

use crate::defaults::{env, logging, paths, quoting};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, Map};
use launch_curve::EngineConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main quoter configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct QuoterConfig {
    /// Global settings
    pub global: GlobalConfig,

    /// Pricing engine settings
    pub engine: EngineConfig,

    /// Request defaults used when the caller omits them
    pub defaults: QuoteDefaults,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// `tracing` filter directive, e.g. `info` or `launch_curve=debug,warn`
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Defaults applied to quote requests
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct QuoteDefaults {
    /// Slippage tolerance in percent
    pub slippage: Decimal,
    /// Token mint decimals
    pub decimals: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: logging::DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            slippage: quoting::DEFAULT_SLIPPAGE_PERCENT,
            decimals: quoting::DEFAULT_TOKEN_DECIMALS,
        }
    }
}

impl QuoterConfig {
    /// Load configuration from files with environment overrides
    ///
    /// An explicit `base_path` must exist. Without one the default
    /// `config/quoter.toml` is used if present.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        Self::load_with_variables(base_path, environment, None)
    }

    /// Same as [`QuoterConfig::load`] but reads overrides from `variables`
    /// instead of the process environment when given
    pub fn load_with_variables(
        base_path: Option<&Path>,
        environment: Option<&str>,
        variables: Option<Map<String, String>>,
    ) -> Result<Self> {
        let (base, required) = match base_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(paths::DEFAULT_CONFIG_FILE), false),
        };

        if required && !base.exists() {
            bail!("Configuration file not found: {:?}", base);
        }

        let mut builder =
            Config::builder().add_source(File::from(base.as_path()).required(required));

        // Add environment-specific overrides if specified
        if let Some(env_name) = environment {
            let env_file = base
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(paths::ENVIRONMENTS_DIR)
                .join(format!("{}.toml", env_name));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (LAUNCH_ prefix)
        builder = builder.add_source(
            Environment::with_prefix(env::PREFIX)
                .prefix_separator("_")
                .separator(env::KEY_SEPARATOR)
                .try_parsing(true)
                .source(variables),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Check cross-field constraints the types cannot express
    pub fn validate(&self) -> Result<()> {
        if self.global.log_level.trim().is_empty() {
            bail!("global.log_level must not be empty");
        }
        if self.defaults.slippage < Decimal::ZERO || self.defaults.slippage > Decimal::ONE_HUNDRED {
            bail!(
                "defaults.slippage must be between 0 and 100 percent, got {}",
                self.defaults.slippage
            );
        }
        if self.defaults.decimals > launch_curve::math::MAX_DECIMALS {
            bail!(
                "defaults.decimals must be <= {}, got {}",
                launch_curve::math::MAX_DECIMALS,
                self.defaults.decimals
            );
        }
        self.engine
            .validate()
            .context("Invalid engine configuration")?;
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Convenience function to load configuration from the default location
pub fn load_config(environment: Option<&str>) -> Result<QuoterConfig> {
    QuoterConfig::load(None, environment)
}
