//! Configuration defaults and constants
//!
//! Default values used when neither a config file nor the environment
//! provides a setting.

/// File locations
pub mod paths {
    /// Base configuration file, relative to the working directory
    pub const DEFAULT_CONFIG_FILE: &str = "config/quoter.toml";

    /// Directory holding `<environment>.toml` overlays, relative to the base file
    pub const ENVIRONMENTS_DIR: &str = "environments";
}

/// Environment variable overrides
pub mod env {
    /// Prefix for overrides such as `LAUNCH_ENGINE__PROTOCOL_FEE_BPS`
    pub const PREFIX: &str = "LAUNCH";

    /// Separator between nested keys
    pub const KEY_SEPARATOR: &str = "__";
}

/// Quote request defaults
pub mod quoting {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Slippage tolerance in percent
    pub const DEFAULT_SLIPPAGE_PERCENT: Decimal = dec!(1);

    /// Mint decimals of launch tokens
    pub const DEFAULT_TOKEN_DECIMALS: u32 = 9;
}

/// Logging defaults
pub mod logging {
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
