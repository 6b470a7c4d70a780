//! Tolerance and integration step derived from token-supply magnitude
//!
//! Token error is roughly `tolerance * scale_factor`, and
//! `scale_factor = supply / total_area`. Requiring the token error to stay
//! under `eps * supply` gives `tolerance = eps * total_area`, independent of
//! supply. Supply only picks `eps`: the larger the supply, the tighter the
//! relative error, so absolute per-token rounding stays bounded.

use crate::curve::CurveShape;
use crate::error::{CurveError, Result};
use crate::math;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Supply above which the tightest tier applies
pub const HUGE_SUPPLY_THRESHOLD: Decimal = dec!(1000000000000000000);
/// Supply above which the middle tier applies
pub const LARGE_SUPPLY_THRESHOLD: Decimal = dec!(1000000000000);

pub const HUGE_SUPPLY_RELATIVE_ERROR: Decimal = dec!(0.00000001);
pub const LARGE_SUPPLY_RELATIVE_ERROR: Decimal = dec!(0.0000001);
pub const DEFAULT_RELATIVE_ERROR: Decimal = dec!(0.000001);

/// Minimum number of integration slices across `[0, target_sol]`
const MIN_SLICES: Decimal = dec!(100000);

/// Numerical parameters for a pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPrecision {
    /// Integration step size in SOL
    pub precision_factor: Decimal,
    /// Absolute tolerance used by the solver and the degenerate-sell guard
    pub tolerance: Decimal,
}

/// Relative error tier for a supply expressed in raw units
pub fn effective_relative_error(updated_total_token_supply: Decimal) -> Decimal {
    if updated_total_token_supply > HUGE_SUPPLY_THRESHOLD {
        HUGE_SUPPLY_RELATIVE_ERROR
    } else if updated_total_token_supply > LARGE_SUPPLY_THRESHOLD {
        LARGE_SUPPLY_RELATIVE_ERROR
    } else {
        DEFAULT_RELATIVE_ERROR
    }
}

/// Derive `precision_factor` and `tolerance`
///
/// # Arguments
/// * `decimals` - Token mint decimals
/// * `supply` - Base token supply in whole tokens (before decimals)
/// * `target_sol` - Raise target in SOL
/// * `shape` - Curve constant and exponent
pub fn derive_precision(
    decimals: u32,
    supply: Decimal,
    target_sol: Decimal,
    shape: &CurveShape,
) -> Result<DerivedPrecision> {
    shape.validate()?;
    if target_sol <= Decimal::ZERO {
        return Err(CurveError::invalid(format!(
            "target SOL must be positive, got {}",
            target_sol
        )));
    }

    let updated_total_token_supply = supply
        .checked_mul(math::pow10(decimals)?)
        .ok_or_else(|| CurveError::overflow(format!("{} * 10^{}", supply, decimals)))?;

    let total_area = shape.total_area(target_sol)?;
    let relative_error = effective_relative_error(updated_total_token_supply);
    let tolerance = relative_error * total_area;

    // f(0) * precision_factor <= tolerance / 10
    let f0 = shape.integrand(Decimal::ZERO)?;
    let from_slices = target_sol / MIN_SLICES;
    let precision_factor = dec!(10)
        .checked_mul(f0)
        .and_then(|denominator| tolerance.checked_div(denominator))
        .map_or(from_slices, |from_derivative| from_derivative.min(from_slices));

    Ok(DerivedPrecision {
        precision_factor,
        tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_shape() -> CurveShape {
        CurveShape::new(dec!(30), dec!(1)).unwrap()
    }

    #[test]
    fn test_supply_tiers() {
        assert_eq!(effective_relative_error(dec!(1000000000000)), dec!(0.000001));
        assert_eq!(effective_relative_error(dec!(1000000000001)), dec!(0.0000001));
        assert_eq!(effective_relative_error(dec!(1000000000000000000)), dec!(0.0000001));
        assert_eq!(effective_relative_error(dec!(1000000000000000001)), dec!(0.00000001));
    }

    #[test]
    fn test_default_tier_values() {
        // 1M tokens * 10^6 = 1e12, not above the large threshold
        let derived = derive_precision(6, dec!(1000000), dec!(85), &reference_shape()).unwrap();

        let expected_tolerance = dec!(0.0000013437347467010946899943);
        assert!((derived.tolerance - expected_tolerance).abs() < dec!(0.000000000000000001));

        // tolerance / (10 * (1/30)) = 3 * tolerance, well under 85 / 1e5
        let from_derivative = derived.tolerance * dec!(3);
        assert!((derived.precision_factor - from_derivative).abs() < dec!(0.000000000000000001));
    }

    #[test]
    fn test_tighter_tier_for_large_supply() {
        let small = derive_precision(9, dec!(1000), dec!(85), &reference_shape()).unwrap();
        let large = derive_precision(9, dec!(1000000000000), dec!(85), &reference_shape()).unwrap();
        assert!((small.tolerance / large.tolerance - dec!(100)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_precision_factor_never_exceeds_slice_bound() {
        let shapes = [(dec!(30), dec!(1)), (dec!(1000000), dec!(0)), (dec!(2), dec!(2))];
        for (constant, exponent) in shapes {
            let shape = CurveShape::new(constant, exponent).unwrap();
            let derived = derive_precision(6, dec!(1000), dec!(85), &shape).unwrap();
            assert!(derived.precision_factor <= dec!(85) / dec!(100000));
            assert!(derived.precision_factor > Decimal::ZERO);
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(derive_precision(9, dec!(1000), dec!(0), &reference_shape()).is_err());
        let bad = CurveShape {
            curve_constant: dec!(0),
            curve_exponent: dec!(1),
        };
        assert!(derive_precision(9, dec!(1000), dec!(85), &bad).is_err());
    }

    #[test]
    fn test_unresolvable_curve_is_an_error() {
        // c^e = 6.4e28 fits a Decimal, but 1/c^e and the curve area round away
        let flat = CurveShape::new(dec!(4000000000), dec!(3)).unwrap();
        assert!(matches!(
            derive_precision(9, dec!(1000000000), dec!(85), &flat),
            Err(CurveError::ArithmeticOverflow { .. })
        ));
    }
}
