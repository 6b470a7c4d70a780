//! Error types for bonding-curve pricing
//!
//! Every error is fatal to the call that produced it. None of them are
//! retryable locally: the only recovery is to fetch a fresh pool snapshot
//! and quote again.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while pricing against a bonding curve
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// A parameter violates a precondition (non-positive curve constant,
    /// reversed integration bounds, slippage outside 0-100, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Purchase would push the raise past the curve target
    #[error("Purchase exceeds curve capacity: {total_after} SOL after purchase, target {target}")]
    ExceedsCurveCapacity { total_after: Decimal, target: Decimal },

    /// Root bracket endpoints evaluate to the same sign
    #[error("Solver bracket [{low}, {high}] is invalid: f(low)={f_low}, f(high)={f_high}")]
    SolverBracketInvalid {
        low: Decimal,
        high: Decimal,
        f_low: Decimal,
        f_high: Decimal,
    },

    /// Iteration cap reached before the bracket collapsed
    #[error("Solver did not converge within {iterations} iterations (best estimate {best})")]
    SolverNoConvergence { iterations: u32, best: Decimal },

    /// Intermediate value left the representable decimal range
    #[error("Arithmetic overflow: {context}")]
    ArithmeticOverflow { context: String },
}

impl CurveError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CurveError>;
