//! Quote assembly: unit conversion, headroom clamping, fee and slippage
//!
//! Takes human-unit requests, converts to the raw integer units the on-chain
//! program uses, runs the curve math and packages both views of the result.
//! Token and SOL amounts are floored so a quote never promises more than the
//! curve can deliver.

use crate::config::EngineConfig;
use crate::curve_math::CurveMath;
use crate::error::{CurveError, Result};
use crate::math::{self, MAX_DECIMALS, SOL_DECIMALS};
use crate::pool_state::PoolSnapshot;
use crate::precision::derive_precision;
use crate::solver::BrentSolver;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Trade direction relative to the pool token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDirection {
    /// SOL in, tokens out
    Buy,
    /// Tokens in, SOL out
    Sell,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::Buy => write!(f, "buy"),
            SwapDirection::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(SwapDirection::Buy),
            "sell" => Ok(SwapDirection::Sell),
            other => Err(CurveError::invalid(format!(
                "unknown swap direction '{}', expected buy or sell",
                other
            ))),
        }
    }
}

/// Caller's quote request in human units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub direction: SwapDirection,
    /// SOL for buys, tokens for sells
    pub amount_in: Decimal,
    /// Slippage tolerance in percent (0-100)
    pub slippage: Decimal,
    /// Token mint decimals
    pub decimals: u32,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount_in.is_sign_negative() && !self.amount_in.is_zero() {
            return Err(CurveError::invalid(format!(
                "amount_in must be non-negative, got {}",
                self.amount_in
            )));
        }
        if self.slippage < Decimal::ZERO || self.slippage > dec!(100) {
            return Err(CurveError::invalid(format!(
                "slippage must be between 0 and 100 percent, got {}",
                self.slippage
            )));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(CurveError::invalid(format!(
                "decimals must be <= {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }
}

/// Raw-unit quote handed to instruction building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSwapQuote {
    /// Lamports for buys, smallest token units for sells
    pub amount_in: u64,
    /// Smallest token units for buys, gross lamports for sells
    pub amount_out: u64,
    pub direction: SwapDirection,
    pub slippage: Decimal,
}

/// Quote result in human units plus the raw quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_out: Decimal,
    pub min_amount_out: Decimal,
    /// Protocol fee in SOL
    pub liquidity_fee: Decimal,
    pub quote: RawSwapQuote,
}

/// Stateless quote engine
#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    config: EngineConfig,
    solver: BrentSolver,
}

impl QuoteEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let solver = BrentSolver::new(config.solver.clone());
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Quote a swap against `pool`
    pub fn quote(&self, pool: &PoolSnapshot, request: &QuoteRequest) -> Result<SwapQuote> {
        pool.validate()?;
        request.validate()?;

        match request.direction {
            SwapDirection::Buy => self.quote_buy(pool, request),
            SwapDirection::Sell => self.quote_sell(pool, request),
        }
    }

    fn quote_buy(&self, pool: &PoolSnapshot, request: &QuoteRequest) -> Result<SwapQuote> {
        let mut lamports = math::to_raw_units(request.amount_in, SOL_DECIMALS)?;
        let headroom = pool.headroom_lamports();
        if lamports > headroom {
            warn!(
                requested = lamports,
                headroom, "buy exceeds remaining raise, clamping to headroom"
            );
            lamports = headroom;
        }

        // Reported only: the program takes its fee from the SOL side
        let fee_lamports = Decimal::from(lamports) * self.config.fee_rate();

        let tokens_issued = CurveMath::get_buy_quote(
            math::from_raw_units(lamports, SOL_DECIMALS)?,
            pool.target_sol()?,
            pool.current_sol()?,
            pool.tradable_tokens(request.decimals)?,
            &pool.shape(),
        )?;

        let raw_out = math::to_raw_units(tokens_issued, request.decimals)?
            .min(pool.tradable_token_supply);
        let raw_min_out = apply_slippage(Decimal::from(raw_out), request.slippage)
            .floor()
            .max(Decimal::ZERO);
        let raw_min_out = math::to_raw_units(raw_min_out, 0)?;

        let quote = SwapQuote {
            amount_out: math::from_raw_units(raw_out, request.decimals)?,
            min_amount_out: math::from_raw_units(raw_min_out, request.decimals)?,
            liquidity_fee: fee_lamports / math::pow10(SOL_DECIMALS)?,
            quote: RawSwapQuote {
                amount_in: lamports,
                amount_out: raw_out,
                direction: SwapDirection::Buy,
                slippage: request.slippage,
            },
        };

        debug!(
            lamports_in = lamports,
            tokens_out = raw_out,
            min_tokens_out = raw_min_out,
            "buy quote assembled"
        );
        Ok(quote)
    }

    fn quote_sell(&self, pool: &PoolSnapshot, request: &QuoteRequest) -> Result<SwapQuote> {
        // Price only what the raw quote actually sends
        let raw_in = math::to_raw_units(request.amount_in, request.decimals)?;
        let tokens_in = math::from_raw_units(raw_in, request.decimals)?;
        let target_sol = pool.target_sol()?;
        let shape = pool.shape();

        let precision = derive_precision(
            request.decimals,
            pool.total_tokens(request.decimals)?,
            target_sol,
            &shape,
        )?;

        let outcome = CurveMath::get_sell_quote(
            tokens_in,
            pool.tradable_tokens(request.decimals)?,
            pool.current_sol()?,
            target_sol,
            &shape,
            precision.tolerance,
            &self.solver,
        )?;

        let sol_received = outcome.sol_received;
        let fee = sol_received * self.config.fee_rate();
        let net_sol = sol_received - fee;
        let min_sol = apply_slippage(net_sol, request.slippage);

        // Gross lamports: the program deducts its own fee on execution
        let raw_out = math::to_raw_units(sol_received, SOL_DECIMALS)?.min(pool.current_sol_raised);

        let quote = SwapQuote {
            amount_out: math::round_down(net_sol, SOL_DECIMALS),
            min_amount_out: math::round_down(min_sol.max(Decimal::ZERO), SOL_DECIMALS),
            liquidity_fee: math::round_down(fee, SOL_DECIMALS),
            quote: RawSwapQuote {
                amount_in: raw_in,
                amount_out: raw_out,
                direction: SwapDirection::Sell,
                slippage: request.slippage,
            },
        };

        debug!(
            tokens_in = raw_in,
            lamports_out = raw_out,
            tolerance = %precision.tolerance,
            resolution = ?outcome.resolution,
            "sell quote assembled"
        );
        Ok(quote)
    }
}

/// `amount - amount * slippage / 100`
fn apply_slippage(amount: Decimal, slippage: Decimal) -> Decimal {
    amount - amount * slippage / dec!(100)
}
