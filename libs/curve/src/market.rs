//! Market metrics derived from a pool snapshot
//!
//! Display-oriented figures: market cap, virtual price per token, marginal
//! (spot) price on the curve and remaining raise headroom.

use crate::error::{CurveError, Result};
use crate::math::{self, SOL_DECIMALS};
use crate::pool_state::PoolSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Remaining raise before the curve target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Headroom {
    pub lamports: u64,
    pub sol: Decimal,
}

/// Market metrics calculator
pub struct MarketMetrics;

impl MarketMetrics {
    /// Market cap in SOL: `total_raised * total_supply / token_balance`
    pub fn market_cap_sol(pool: &PoolSnapshot) -> Result<Decimal> {
        pool.validate()?;
        let total_raised = pool
            .total_raised
            .ok_or_else(|| CurveError::invalid("snapshot has no total_raised"))?;
        let token_balance = pool
            .token_balance
            .ok_or_else(|| CurveError::invalid("snapshot has no token_balance"))?;
        if token_balance == 0 {
            return Err(CurveError::invalid("pool token balance is zero"));
        }

        let raised_sol = math::from_raw_units(total_raised, SOL_DECIMALS)?;
        let cap = raised_sol
            .checked_mul(Decimal::from(pool.total_supply))
            .ok_or_else(|| CurveError::overflow("market cap numerator"))?;
        cap.checked_div(Decimal::from(token_balance))
            .ok_or_else(|| CurveError::overflow("market cap"))
    }

    /// Market cap divided by mint supply in whole tokens
    pub fn virtual_price_per_token(pool: &PoolSnapshot, decimals: u32) -> Result<Decimal> {
        let market_cap = Self::market_cap_sol(pool)?;
        let supply = pool.total_tokens(decimals)?;
        market_cap
            .checked_div(supply)
            .ok_or_else(|| CurveError::overflow("virtual price"))
    }

    /// SOL per whole token for an infinitesimal buy at the current raise
    ///
    /// d(tokens)/d(sol) = tradable / total_area * integrand(current), so the
    /// price is its reciprocal.
    pub fn spot_price(pool: &PoolSnapshot, decimals: u32) -> Result<Decimal> {
        pool.validate()?;
        let shape = pool.shape();
        let total_area = shape.total_area(pool.target_sol()?)?;
        let marginal = shape.integrand(pool.current_sol()?)?;
        let tokens_per_sol = pool
            .tradable_tokens(decimals)?
            .checked_div(total_area)
            .and_then(|scale| scale.checked_mul(marginal))
            .ok_or_else(|| CurveError::overflow("marginal tokens per SOL"))?;
        Decimal::ONE
            .checked_div(tokens_per_sol)
            .ok_or_else(|| CurveError::overflow("spot price"))
    }

    pub fn headroom(pool: &PoolSnapshot) -> Result<Headroom> {
        let lamports = pool.headroom_lamports();
        Ok(Headroom {
            lamports,
            sol: math::from_raw_units(lamports, SOL_DECIMALS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool() -> PoolSnapshot {
        PoolSnapshot {
            curve_constant: dec!(30),
            curve_exponent: dec!(1),
            target_raise: 85_000_000_000,
            current_sol_raised: 40_000_000_000,
            tradable_token_supply: 800_000_000_000_000_000,
            total_supply: 1_000_000_000_000_000_000,
            total_raised: Some(40_400_000_000),
            token_balance: Some(500_000_000_000_000_000),
        }
    }

    #[test]
    fn test_market_cap_and_virtual_price() {
        // 40.4 SOL * 1e9 tokens / 5e8 tokens
        let cap = MarketMetrics::market_cap_sol(&pool()).unwrap();
        assert_eq!(cap, dec!(80.8));

        let price = MarketMetrics::virtual_price_per_token(&pool(), 9).unwrap();
        assert_eq!(price, dec!(0.0000000808));
    }

    #[test]
    fn test_market_cap_requires_balances() {
        let mut missing = pool();
        missing.token_balance = None;
        assert!(MarketMetrics::market_cap_sol(&missing).is_err());

        let mut empty = pool();
        empty.token_balance = Some(0);
        assert!(MarketMetrics::market_cap_sol(&empty).is_err());
    }

    #[test]
    fn test_zero_mint_supply_is_invalid() {
        let mut unminted = pool();
        unminted.total_supply = 0;
        assert!(matches!(
            MarketMetrics::market_cap_sol(&unminted),
            Err(CurveError::InvalidInput { .. })
        ));
        assert!(matches!(
            MarketMetrics::virtual_price_per_token(&unminted, 9),
            Err(CurveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_spot_price_on_unresolvable_curve() {
        let mut flat = pool();
        flat.curve_constant = dec!(4000000000);
        flat.curve_exponent = dec!(3);
        assert!(matches!(
            MarketMetrics::spot_price(&flat, 9),
            Err(CurveError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_spot_price_rises_along_curve() {
        let mut early = pool();
        early.current_sol_raised = 0;
        let late = pool();

        let early_price = MarketMetrics::spot_price(&early, 9).unwrap();
        let late_price = MarketMetrics::spot_price(&late, 9).unwrap();
        assert!(late_price > early_price);

        // At the origin: 30 * ln(115/30) / 800M SOL per token
        let expected = dec!(30) * dec!(1.3437347467010946899942754734) / dec!(800000000);
        assert!((early_price - expected).abs() < dec!(0.0000000000000001));
    }

    #[test]
    fn test_headroom() {
        let headroom = MarketMetrics::headroom(&pool()).unwrap();
        assert_eq!(headroom.lamports, 45_000_000_000);
        assert_eq!(headroom.sol, dec!(45));
    }
}
