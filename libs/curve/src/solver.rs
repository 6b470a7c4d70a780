//! Brent's method root finder over `Decimal`
//!
//! Function-agnostic: takes any fallible scalar function and a bracket whose
//! endpoints have opposite signs. Combines inverse quadratic interpolation,
//! secant steps and bisection, falling back to bisection whenever an
//! interpolated step would not shrink the bracket fast enough.

use crate::error::{CurveError, Result};
use crate::math::DECIMAL_EPSILON;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Solver knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Hard cap on iterations before `SolverNoConvergence`
    pub max_iterations: u32,
    /// Relative precision term in `tol = 2*eps*|b| + tolerance/2`
    pub epsilon: Decimal,
    /// Stop as soon as `|f(b)|` is at or below this (zero = exact root only)
    pub residual_tolerance: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            epsilon: DECIMAL_EPSILON,
            residual_tolerance: Decimal::ZERO,
        }
    }
}

/// Converged root with diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub root: Decimal,
    /// f(root)
    pub residual: Decimal,
    /// Function evaluations performed after the two bracket endpoints
    pub iterations: u32,
}

/// Bracketed root finder
#[derive(Debug, Clone, Default)]
pub struct BrentSolver {
    config: SolverConfig,
}

impl BrentSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find `x` in `[low, high]` with `f(x) = 0`
    ///
    /// # Errors
    /// - `InvalidInput` if `low > high` or `tolerance` is negative
    /// - `SolverBracketInvalid` if `f(low)` and `f(high)` share a sign
    /// - `SolverNoConvergence` if the iteration cap is reached
    /// - any error returned by `f`
    pub fn solve<F>(
        &self,
        f: F,
        low: Decimal,
        high: Decimal,
        tolerance: Decimal,
    ) -> Result<RootEstimate>
    where
        F: Fn(Decimal) -> Result<Decimal>,
    {
        if low > high {
            return Err(CurveError::invalid(format!(
                "solver bracket reversed: low={} > high={}",
                low, high
            )));
        }
        if tolerance.is_sign_negative() && !tolerance.is_zero() {
            return Err(CurveError::invalid(format!(
                "solver tolerance must be non-negative, got {}",
                tolerance
            )));
        }

        let mut a = low;
        let mut b = high;
        let mut fa = f(a)?;
        let mut fb = f(b)?;

        // An endpoint that is already a root needs no bracketing
        if fa.is_zero() {
            return Ok(RootEstimate { root: a, residual: fa, iterations: 0 });
        }
        if fb.is_zero() {
            return Ok(RootEstimate { root: b, residual: fb, iterations: 0 });
        }
        if same_sign(fa, fb) {
            return Err(CurveError::SolverBracketInvalid {
                low,
                high,
                f_low: fa,
                f_high: fb,
            });
        }

        // c is the contrapoint: f(b) and f(c) always have opposite signs
        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        for iteration in 0..self.config.max_iterations {
            if same_sign(fb, fc) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            // Keep the best estimate in b
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = dec!(2) * self.config.epsilon * b.abs() + dec!(0.5) * tolerance;
            let half_width = (c - b) / dec!(2);

            trace!(
                iteration,
                best = %b,
                residual = %fb,
                half_width = %half_width,
                "brent step"
            );

            if half_width.abs() <= tol || fb.abs() <= self.config.residual_tolerance {
                debug!(root = %b, iterations = iteration, "brent converged");
                return Ok(RootEstimate {
                    root: b,
                    residual: fb,
                    iterations: iteration,
                });
            }

            let (step, previous_step) = if e.abs() >= tol && fa.abs() > fb.abs() {
                match interpolate(a, b, c, fa, fb, fc, half_width) {
                    Some((p, q)) => {
                        let min1 = dec!(3) * half_width * q - (tol * q).abs();
                        let min2 = (e * q).abs();
                        match p.checked_div(q) {
                            Some(ratio) if dec!(2) * p < min1.min(min2) => (ratio, d),
                            _ => (half_width, half_width),
                        }
                    }
                    None => (half_width, half_width),
                }
            } else {
                (half_width, half_width)
            };
            d = step;
            e = previous_step;

            a = b;
            fa = fb;
            if d.abs() > tol {
                b += d;
            } else if half_width.is_sign_positive() {
                b += tol;
            } else {
                b -= tol;
            }
            fb = f(b)?;
        }

        Err(CurveError::SolverNoConvergence {
            iterations: self.config.max_iterations,
            best: b,
        })
    }
}

fn same_sign(x: Decimal, y: Decimal) -> bool {
    (x.is_sign_positive() && y.is_sign_positive()) || (x.is_sign_negative() && y.is_sign_negative())
}

/// Secant (a == c) or inverse quadratic interpolation step as `(p, q)`,
/// normalised so that `p >= 0` and the proposed step is `p / q`.
fn interpolate(
    a: Decimal,
    b: Decimal,
    c: Decimal,
    fa: Decimal,
    fb: Decimal,
    fc: Decimal,
    half_width: Decimal,
) -> Option<(Decimal, Decimal)> {
    let s = fb.checked_div(fa)?;
    let (mut p, mut q) = if a == c {
        (dec!(2) * half_width * s, Decimal::ONE - s)
    } else {
        let q = fa.checked_div(fc)?;
        let r = fb.checked_div(fc)?;
        let p = s * (dec!(2) * half_width * q * (q - r) - (b - a) * (r - Decimal::ONE));
        let q = (q - Decimal::ONE) * (r - Decimal::ONE) * (s - Decimal::ONE);
        (p, q)
    };

    if p.is_sign_positive() && !p.is_zero() {
        q = -q;
    }
    p = p.abs();

    if q.is_zero() {
        return None;
    }
    Some((p, q))
}
