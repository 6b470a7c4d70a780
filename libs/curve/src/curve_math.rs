//! Buy and sell pricing against the bonding curve
//!
//! Works in human units throughout: SOL amounts in SOL, token amounts in
//! whole tokens. Unit conversion, fees and slippage live in `quote`.

use crate::curve::CurveShape;
use crate::error::{CurveError, Result};
use crate::solver::BrentSolver;
use rust_decimal::Decimal;
use tracing::{debug, trace};

/// How a sell quote was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellResolution {
    /// Remaining area fell under tolerance; the whole raise is returned
    Degenerate,
    /// Solved by root finding in this many iterations
    Solved { iterations: u32 },
}

/// SOL released by a sell plus how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellOutcome {
    pub sol_received: Decimal,
    pub resolution: SellResolution,
}

/// Bonding-curve pricing functions
pub struct CurveMath;

impl CurveMath {
    /// Tokens issued for `buy_sol_amount` SOL
    ///
    /// # Arguments
    /// * `buy_sol_amount` - SOL paid in
    /// * `curve_target_sol` - Raise target in SOL
    /// * `current_sol_raised` - SOL raised before this purchase
    /// * `tradable_token_supply` - Tokens the full curve issues (whole tokens)
    /// * `shape` - Curve constant and exponent
    ///
    /// # Errors
    /// `ExceedsCurveCapacity` if the purchase would pass `curve_target_sol`.
    pub fn get_buy_quote(
        buy_sol_amount: Decimal,
        curve_target_sol: Decimal,
        current_sol_raised: Decimal,
        tradable_token_supply: Decimal,
        shape: &CurveShape,
    ) -> Result<Decimal> {
        if buy_sol_amount.is_sign_negative() && !buy_sol_amount.is_zero() {
            return Err(CurveError::invalid(format!(
                "buy amount must be non-negative, got {}",
                buy_sol_amount
            )));
        }
        if curve_target_sol <= Decimal::ZERO {
            return Err(CurveError::invalid(format!(
                "curve target must be positive, got {}",
                curve_target_sol
            )));
        }

        let total_after = current_sol_raised + buy_sol_amount;
        if total_after > curve_target_sol {
            return Err(CurveError::ExceedsCurveCapacity {
                total_after,
                target: curve_target_sol,
            });
        }

        let total_area = shape.total_area(curve_target_sol)?;
        let scale_factor = tradable_token_supply
            .checked_div(total_area)
            .ok_or_else(|| CurveError::overflow("buy scale factor"))?;
        let purchase_area = shape.area(current_sol_raised, total_after)?;
        let tokens_issued = scale_factor
            .checked_mul(purchase_area)
            .ok_or_else(|| CurveError::overflow("tokens issued"))?;

        trace!(
            buy_sol = %buy_sol_amount,
            scale_factor = %scale_factor,
            purchase_area = %purchase_area,
            tokens = %tokens_issued,
            "buy quote"
        );

        Ok(tokens_issued)
    }

    /// SOL released by selling `tokens_to_sell`
    ///
    /// Finds the raise level `t` such that the area from `t` up to the
    /// current raise matches the sold share of the curve, then returns
    /// `current_sol_raised - t`.
    ///
    /// # Arguments
    /// * `tokens_to_sell` - Tokens sold (whole tokens)
    /// * `total_token_supply` - Tokens the full curve issues (whole tokens)
    /// * `current_sol_raised` - SOL raised so far
    /// * `target_sol` - Raise target in SOL
    /// * `shape` - Curve constant and exponent
    /// * `tolerance` - Solver tolerance and degenerate-area threshold
    /// * `solver` - Root finder used for the inversion
    #[allow(clippy::too_many_arguments)]
    pub fn get_sell_quote(
        tokens_to_sell: Decimal,
        total_token_supply: Decimal,
        current_sol_raised: Decimal,
        target_sol: Decimal,
        shape: &CurveShape,
        tolerance: Decimal,
        solver: &BrentSolver,
    ) -> Result<SellOutcome> {
        if tokens_to_sell.is_sign_negative() && !tokens_to_sell.is_zero() {
            return Err(CurveError::invalid(format!(
                "sell amount must be non-negative, got {}",
                tokens_to_sell
            )));
        }
        if total_token_supply <= Decimal::ZERO {
            return Err(CurveError::invalid(format!(
                "total token supply must be positive, got {}",
                total_token_supply
            )));
        }

        if target_sol <= Decimal::ZERO {
            return Err(CurveError::invalid(format!(
                "target SOL must be positive, got {}",
                target_sol
            )));
        }

        let token_percentage = tokens_to_sell
            .checked_div(total_token_supply)
            .ok_or_else(|| CurveError::overflow("sell token share"))?;
        let total_area = shape.total_area(target_sol)?;
        let target_area = token_percentage
            .checked_mul(total_area)
            .ok_or_else(|| CurveError::overflow("sell target area"))?;
        let current_area = shape.area(Decimal::ZERO, current_sol_raised)?;
        let new_area = current_area - target_area;

        if tolerance > new_area {
            // Root sits at the curve origin: area(0, 0) = 0
            debug!(
                new_area = %new_area,
                tolerance = %tolerance,
                "sell consumes the whole raise, skipping solver"
            );
            return Ok(SellOutcome {
                sol_received: current_sol_raised,
                resolution: SellResolution::Degenerate,
            });
        }

        let estimate = solver.solve(
            |sol| Ok(shape.area(Decimal::ZERO, sol)? - new_area),
            Decimal::ZERO,
            current_sol_raised,
            tolerance,
        )?;

        let sol_received = (current_sol_raised - estimate.root)
            .max(Decimal::ZERO)
            .min(current_sol_raised);

        trace!(
            tokens = %tokens_to_sell,
            new_area = %new_area,
            root = %estimate.root,
            sol = %sol_received,
            "sell quote"
        );

        Ok(SellOutcome {
            sol_received,
            resolution: SellResolution::Solved {
                iterations: estimate.iterations,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SUPPLY: Decimal = dec!(800000000);

    fn log_shape() -> CurveShape {
        CurveShape::new(dec!(30), dec!(1)).unwrap()
    }

    #[test]
    fn test_reference_buy() {
        // 800M * ln(31/30) / ln(115/30)
        let tokens = CurveMath::get_buy_quote(dec!(1), dec!(85), dec!(0), SUPPLY, &log_shape())
            .unwrap();
        assert!((tokens - dec!(19521604.485403552382247653)).abs() < dec!(0.001));
    }

    #[test]
    fn test_buy_over_capacity_rejected() {
        let err = CurveMath::get_buy_quote(dec!(10), dec!(85), dec!(80), SUPPLY, &log_shape())
            .unwrap_err();
        assert!(matches!(err, CurveError::ExceedsCurveCapacity { .. }));
    }

    #[test]
    fn test_full_curve_issues_full_supply() {
        let tokens = CurveMath::get_buy_quote(dec!(85), dec!(85), dec!(0), SUPPLY, &log_shape())
            .unwrap();
        assert!((tokens - SUPPLY).abs() < dec!(0.000001));
    }

    #[test]
    fn test_sell_inverts_buy() {
        let shape = CurveShape::new(dec!(30), dec!(1.5)).unwrap();
        let solver = BrentSolver::default();
        let tolerance = dec!(0.0000001);

        let bought =
            CurveMath::get_buy_quote(dec!(3), dec!(85), dec!(10), SUPPLY, &shape).unwrap();
        let outcome = CurveMath::get_sell_quote(
            bought,
            dec!(800000000),
            dec!(13),
            dec!(85),
            &shape,
            tolerance,
            &solver,
        )
        .unwrap();

        assert!(matches!(outcome.resolution, SellResolution::Solved { .. }));
        assert!((outcome.sol_received - dec!(3)).abs() <= tolerance);
    }

    #[test]
    fn test_degenerate_sell_returns_whole_raise() {
        let solver = BrentSolver::default();
        let outcome = CurveMath::get_sell_quote(
            dec!(900000000),
            dec!(800000000),
            dec!(12.5),
            dec!(85),
            &log_shape(),
            dec!(0.000001),
            &solver,
        )
        .unwrap();

        assert_eq!(outcome.sol_received, dec!(12.5));
        assert_eq!(outcome.resolution, SellResolution::Degenerate);
    }

    #[test]
    fn test_sell_on_empty_pool_is_zero() {
        let solver = BrentSolver::default();
        let outcome = CurveMath::get_sell_quote(
            dec!(1000),
            dec!(800000000),
            dec!(0),
            dec!(85),
            &log_shape(),
            dec!(0.000001),
            &solver,
        )
        .unwrap();
        assert_eq!(outcome.sol_received, Decimal::ZERO);
    }

    #[test]
    fn test_selling_nothing_returns_nothing() {
        let solver = BrentSolver::default();
        let outcome = CurveMath::get_sell_quote(
            dec!(0),
            dec!(800000000),
            dec!(20),
            dec!(85),
            &log_shape(),
            dec!(0.000001),
            &solver,
        )
        .unwrap();
        assert_eq!(outcome.sol_received, Decimal::ZERO);
    }

    #[test]
    fn test_unresolvable_curve_is_an_error() {
        // 1/(x + 1e16)^2 integrates to ~8.5e-31 over the raise
        let flat = CurveShape::new(dec!(10000000000000000), dec!(2)).unwrap();
        let solver = BrentSolver::default();

        let buy = CurveMath::get_buy_quote(dec!(1), dec!(85), dec!(0), SUPPLY, &flat);
        assert!(matches!(buy, Err(CurveError::ArithmeticOverflow { .. })));

        let sell = CurveMath::get_sell_quote(
            dec!(1),
            SUPPLY,
            dec!(1),
            dec!(85),
            &flat,
            dec!(0.000001),
            &solver,
        );
        assert!(matches!(sell, Err(CurveError::ArithmeticOverflow { .. })));
    }
}
