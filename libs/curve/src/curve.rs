//! Closed-form integral of the bonding-curve price function
//!
//! The integrand is `1 / (x + c)^e`, where `x` is SOL raised so far, `c` the
//! curve constant (horizontal shift) and `e` the curve exponent. Token
//! issuance is proportional to the area under this curve, so everything in
//! the engine reduces to evaluating `area(x1, x2)`.

use crate::error::{CurveError, Result};
use crate::math;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Smallest whole-curve area still carrying ten significant digits at
/// 28 decimal places
pub const MIN_RESOLVABLE_AREA: Decimal = dec!(0.000000000000000001);

/// Shape parameters of the price curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveShape {
    pub curve_constant: Decimal,
    pub curve_exponent: Decimal,
}

impl CurveShape {
    /// Validated constructor: `c > 0`, `e >= 0`
    pub fn new(curve_constant: Decimal, curve_exponent: Decimal) -> Result<Self> {
        let shape = Self {
            curve_constant,
            curve_exponent,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<()> {
        if self.curve_constant <= Decimal::ZERO {
            return Err(CurveError::invalid(format!(
                "curve constant must be positive, got {}",
                self.curve_constant
            )));
        }
        if self.curve_exponent.is_sign_negative() && !self.curve_exponent.is_zero() {
            return Err(CurveError::invalid(format!(
                "curve exponent must be non-negative, got {}",
                self.curve_exponent
            )));
        }
        Ok(())
    }

    fn is_logarithmic(&self) -> bool {
        self.curve_exponent == Decimal::ONE
    }

    /// Price-function value `1 / (x + c)^e`
    pub fn integrand(&self, x: Decimal) -> Result<Decimal> {
        let shifted = self.shifted(x)?;
        let denominator = math::powd(shifted, self.curve_exponent)?;
        Decimal::ONE
            .checked_div(denominator)
            .ok_or_else(|| CurveError::overflow(format!("integrand at x={}", x)))
    }

    /// Area under the curve between `x1` and `x2`
    ///
    /// # Errors
    /// `InvalidInput` when `x1 > x2` or `x1 + c <= 0`.
    pub fn area(&self, x1: Decimal, x2: Decimal) -> Result<Decimal> {
        if x1 > x2 {
            return Err(CurveError::invalid(format!(
                "integration bounds reversed: x1={} > x2={}",
                x1, x2
            )));
        }
        if x1 == x2 {
            return Ok(Decimal::ZERO);
        }

        let lower = self.shifted(x1)?;
        let upper = self.shifted(x2)?;

        if self.is_logarithmic() {
            // ln(x2 + c) - ln(x1 + c)
            return Ok(math::ln(upper)? - math::ln(lower)?);
        }

        // ((x2 + c)^(1-e) - (x1 + c)^(1-e)) / (1 - e)
        let one_minus_exp = Decimal::ONE - self.curve_exponent;
        let end = math::powd(upper, one_minus_exp)?;
        let start = math::powd(lower, one_minus_exp)?;
        (end / one_minus_exp)
            .checked_sub(start / one_minus_exp)
            .ok_or_else(|| CurveError::overflow(format!("area({}, {})", x1, x2)))
    }

    /// Area over the whole raise, `area(0, target_sol)`
    ///
    /// # Errors
    /// `ArithmeticOverflow` when `c^e` is so large that the area falls below
    /// [`MIN_RESOLVABLE_AREA`] and every quote on the curve would be noise.
    pub fn total_area(&self, target_sol: Decimal) -> Result<Decimal> {
        let area = self.area(Decimal::ZERO, target_sol)?;
        if area < MIN_RESOLVABLE_AREA {
            return Err(CurveError::overflow(format!(
                "curve area {} over [0, {}] is below decimal resolution (c={}, e={})",
                area, target_sol, self.curve_constant, self.curve_exponent
            )));
        }
        Ok(area)
    }

    fn shifted(&self, x: Decimal) -> Result<Decimal> {
        let shifted = x
            .checked_add(self.curve_constant)
            .ok_or_else(|| CurveError::overflow(format!("{} + {}", x, self.curve_constant)))?;
        if shifted <= Decimal::ZERO {
            return Err(CurveError::invalid(format!(
                "x={} lies left of the curve origin (x + c = {})",
                x, shifted
            )));
        }
        Ok(shifted)
    }
}

/// Area under `1/(x+c)^e` from `x1` to `x2`
pub fn calculate_area(
    x1: Decimal,
    x2: Decimal,
    curve_constant: Decimal,
    curve_exponent: Decimal,
) -> Result<Decimal> {
    CurveShape::new(curve_constant, curve_exponent)?.area(x1, x2)
}
