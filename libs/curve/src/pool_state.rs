//! Immutable pool snapshot supplied by the caller
//!
//! Integer fields are raw on-chain units (lamports, smallest token units);
//! curve shape fields are decimals. The engine never mutates a snapshot.

use crate::curve::CurveShape;
use crate::error::{CurveError, Result};
use crate::math::{self, SOL_DECIMALS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bonding-curve pool state at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Horizontal shift of the curve (must be positive)
    pub curve_constant: Decimal,
    /// Curve exponent (must be non-negative)
    pub curve_exponent: Decimal,
    /// Raise cap in lamports
    pub target_raise: u64,
    /// Lamports raised so far, never above `target_raise`
    pub current_sol_raised: u64,
    /// Tokens the curve sells, smallest units
    pub tradable_token_supply: u64,
    /// Mint supply, smallest units
    pub total_supply: u64,
    /// Lamports raised including fees (market metrics only)
    #[serde(default)]
    pub total_raised: Option<u64>,
    /// Tokens still held by the pool treasury (market metrics only)
    #[serde(default)]
    pub token_balance: Option<u64>,
}

impl PoolSnapshot {
    pub fn shape(&self) -> CurveShape {
        CurveShape {
            curve_constant: self.curve_constant,
            curve_exponent: self.curve_exponent,
        }
    }

    /// Check snapshot invariants
    pub fn validate(&self) -> Result<()> {
        self.shape().validate()?;

        if self.target_raise == 0 {
            return Err(CurveError::invalid("target raise must be positive"));
        }
        if self.current_sol_raised > self.target_raise {
            return Err(CurveError::invalid(format!(
                "current raise {} exceeds target {}",
                self.current_sol_raised, self.target_raise
            )));
        }
        if self.tradable_token_supply == 0 {
            return Err(CurveError::invalid("tradable token supply must be positive"));
        }
        if self.total_supply == 0 {
            return Err(CurveError::invalid("total supply must be positive"));
        }
        Ok(())
    }

    /// Lamports left before the raise target
    pub fn headroom_lamports(&self) -> u64 {
        self.target_raise.saturating_sub(self.current_sol_raised)
    }

    pub fn target_sol(&self) -> Result<Decimal> {
        math::from_raw_units(self.target_raise, SOL_DECIMALS)
    }

    pub fn current_sol(&self) -> Result<Decimal> {
        math::from_raw_units(self.current_sol_raised, SOL_DECIMALS)
    }

    /// Tradable supply in whole tokens
    pub fn tradable_tokens(&self, decimals: u32) -> Result<Decimal> {
        math::from_raw_units(self.tradable_token_supply, decimals)
    }

    /// Mint supply in whole tokens
    pub fn total_tokens(&self, decimals: u32) -> Result<Decimal> {
        math::from_raw_units(self.total_supply, decimals)
    }
}
