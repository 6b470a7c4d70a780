//! Engine configuration
//!
//! Defaults reproduce the protocol: a flat 1% fee and a 1000-iteration
//! solver cap. Hosts override them through the `[engine]` section of the
//! layered loader in `launch-config`.

use crate::error::{CurveError, Result};
use crate::solver::SolverConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Basis points in 100%
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Quote engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Protocol fee in basis points (100 = 1%)
    pub protocol_fee_bps: u32,
    /// Root finder settings for sell quotes
    pub solver: SolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            protocol_fee_bps: 100,
            solver: SolverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Fee as a fraction (0.01 for 100 bps)
    pub fn fee_rate(&self) -> Decimal {
        Decimal::from(self.protocol_fee_bps) / Decimal::from(BPS_DENOMINATOR)
    }

    pub fn validate(&self) -> Result<()> {
        if self.protocol_fee_bps > BPS_DENOMINATOR {
            return Err(CurveError::invalid(format!(
                "protocol_fee_bps must be <= {} (100%), got {}",
                BPS_DENOMINATOR, self.protocol_fee_bps
            )));
        }
        if self.solver.max_iterations == 0 {
            return Err(CurveError::invalid("solver.max_iterations must be positive"));
        }
        if self.solver.epsilon.is_sign_negative() && !self.solver.epsilon.is_zero() {
            return Err(CurveError::invalid("solver.epsilon must be non-negative"));
        }
        let residual = self.solver.residual_tolerance;
        if residual.is_sign_negative() && !residual.is_zero() {
            return Err(CurveError::invalid("solver.residual_tolerance must be non-negative"));
        }
        Ok(())
    }
}
