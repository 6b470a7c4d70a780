//! Decimal primitives for curve evaluation and unit conversion
//!
//! Logarithms come from `rust_decimal`'s `maths` feature. Exponentials are
//! range-reduced before the series is summed: the stock `exp` stops at a
//! loose tolerance that is fine for display but not for integrals whose two
//! terms nearly cancel.

use crate::error::{CurveError, Result};
use rust_decimal::prelude::{MathematicalOps, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Lamports per SOL (SOL uses 9 decimal places)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: u32 = 9;

/// Largest scale a `Decimal` can carry
pub const MAX_DECIMALS: u32 = 28;

/// Smallest positive step at full `Decimal` scale
pub const DECIMAL_EPSILON: Decimal = dec!(0.0000000000000000000000000001);

/// Argument bound for the Taylor series after halving
const EXP_REDUCED_LIMIT: Decimal = dec!(0.5);
const EXP_MAX_TERMS: u32 = 64;

/// 10^exponent as an exact decimal
pub fn pow10(exponent: u32) -> Result<Decimal> {
    if exponent > MAX_DECIMALS {
        return Err(CurveError::overflow(format!(
            "10^{} exceeds decimal range",
            exponent
        )));
    }
    Ok(Decimal::from_i128_with_scale(10i128.pow(exponent), 0))
}

/// Natural logarithm; rejects non-positive arguments
pub fn ln(value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(CurveError::invalid(format!(
            "logarithm of non-positive value {}",
            value
        )));
    }
    value
        .checked_ln()
        .ok_or_else(|| CurveError::overflow(format!("ln({}) out of range", value)))
}

/// e^value with argument halving, so the series always sees |x| <= 0.5
pub fn exp(value: Decimal) -> Result<Decimal> {
    if value.is_zero() {
        return Ok(Decimal::ONE);
    }
    if value.is_sign_negative() {
        let positive = exp(-value)?;
        return Decimal::ONE
            .checked_div(positive)
            .ok_or_else(|| CurveError::overflow(format!("exp({}) underflow", value)));
    }

    let mut reduced = value;
    let mut halvings = 0u32;
    while reduced > EXP_REDUCED_LIMIT {
        reduced /= dec!(2);
        halvings += 1;
    }

    // Taylor series: sum of x^n / n!
    let mut result = Decimal::ONE;
    let mut term = Decimal::ONE;
    for n in 1..=EXP_MAX_TERMS {
        term = term * reduced / Decimal::from(n);
        if term < DECIMAL_EPSILON {
            break;
        }
        result += term;
    }

    for _ in 0..halvings {
        result = result
            .checked_mul(result)
            .ok_or_else(|| CurveError::overflow(format!("exp({}) overflow", value)))?;
    }

    Ok(result)
}

/// base^exponent for a positive base
///
/// Integer exponents are evaluated exactly by repeated multiplication;
/// everything else goes through exp(exponent * ln(base)).
pub fn powd(base: Decimal, exponent: Decimal) -> Result<Decimal> {
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if base <= Decimal::ZERO {
        return Err(CurveError::invalid(format!(
            "power of non-positive base {}",
            base
        )));
    }

    if exponent.fract().is_zero() {
        let n = exponent.to_i64().ok_or_else(|| {
            CurveError::overflow(format!("integer exponent {} out of range", exponent))
        })?;
        return base
            .checked_powi(n)
            .ok_or_else(|| CurveError::overflow(format!("{}^{} out of range", base, n)));
    }

    let log = ln(base)?;
    let scaled = log
        .checked_mul(exponent)
        .ok_or_else(|| CurveError::overflow(format!("{}^{} out of range", base, exponent)))?;
    exp(scaled)
}

/// Human amount -> raw smallest units, floored
pub fn to_raw_units(amount: Decimal, decimals: u32) -> Result<u64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CurveError::invalid(format!(
            "cannot convert negative amount {} to raw units",
            amount
        )));
    }
    let scaled = amount
        .checked_mul(pow10(decimals)?)
        .ok_or_else(|| CurveError::overflow(format!("{} * 10^{}", amount, decimals)))?;
    scaled
        .floor()
        .to_u64()
        .ok_or_else(|| CurveError::overflow(format!("{} does not fit in u64 raw units", scaled)))
}

/// Raw smallest units -> human amount (exact)
pub fn from_raw_units(raw: u64, decimals: u32) -> Result<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(CurveError::overflow(format!(
            "scale {} exceeds decimal range",
            decimals
        )));
    }
    Ok(Decimal::from_i128_with_scale(raw as i128, decimals))
}

/// Truncate toward zero at `dp` decimal places
pub fn round_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}
