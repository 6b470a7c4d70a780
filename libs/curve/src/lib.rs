//! # Launch Curve - Bonding-Curve Pricing Engine
//!
//! ## Purpose
//!
//! Decimal-exact pricing for continuous bonding-curve token sales. Given a pool
//! snapshot (curve shape, raise target, SOL raised, token supplies) the engine
//! quotes how many tokens a SOL amount buys and how much SOL a token amount
//! sells for, enforcing the raise cap and keeping numerical error bounded as
//! supplies approach 10^18 raw units and beyond.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots fetched by the caller (on-chain account
//!   reads happen elsewhere), human-unit quote requests
//! - **Output Destinations**: UI quote display, instruction builders consuming
//!   [`RawSwapQuote`]
//! - **Curve**: `price(x) = 1 / (x + c)^e`, token issuance proportional to the
//!   area under the curve
//! - **Precision**: `rust_decimal::Decimal` throughout, no floating point
//!
//! ## Architecture Role
//!
//! ```text
//! PoolSnapshot + QuoteRequest
//!        ↓
//! [QuoteEngine]  unit conversion, headroom clamp, fee, slippage
//!        ↓                         ↓
//! [CurveMath::get_buy_quote]  [CurveMath::get_sell_quote]
//!        ↓                         ↓              ↓
//! [CurveShape::area]  ←───────────────   [BrentSolver]   [derive_precision]
//! ```
//!
//! Every call is a pure function of its inputs. Nothing is cached and no
//! state is shared, so the engine can be used from any number of threads.
//!
//! ## Performance Profile
//!
//! - **Buy quote**: two closed-form integrals
//! - **Sell quote**: one precision derivation plus a Brent solve, typically
//!   under 15 iterations
//! - **Solver cap**: 1000 iterations by default

pub mod config;
pub mod curve;
pub mod curve_math;
pub mod error;
pub mod market;
pub mod math;
pub mod pool_state;
pub mod precision;
pub mod quote;
pub mod solver;

pub use config::EngineConfig;
pub use curve::{calculate_area, CurveShape};
pub use curve_math::{CurveMath, SellOutcome, SellResolution};
pub use error::{CurveError, Result};
pub use market::{Headroom, MarketMetrics};
pub use math::{LAMPORTS_PER_SOL, SOL_DECIMALS};
pub use pool_state::PoolSnapshot;
pub use precision::{derive_precision, DerivedPrecision};
pub use quote::{QuoteEngine, QuoteRequest, RawSwapQuote, SwapDirection, SwapQuote};
pub use solver::{BrentSolver, RootEstimate, SolverConfig};

/// Common types for curve calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
