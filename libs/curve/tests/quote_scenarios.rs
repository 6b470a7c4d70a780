//! End-to-end quote scenarios against realistic pool snapshots

use launch_curve::{
    derive_precision, CurveError, CurveShape, PoolSnapshot, QuoteEngine, QuoteRequest,
    SwapDirection, LAMPORTS_PER_SOL,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

const POOL_JSON: &str = r#"{
    "curve_constant": "30",
    "curve_exponent": "1",
    "target_raise": 85000000000,
    "current_sol_raised": 0,
    "tradable_token_supply": 800000000000000000,
    "total_supply": 1000000000000000000
}"#;

fn launch_pool() -> PoolSnapshot {
    serde_json::from_str(POOL_JSON).unwrap()
}

fn buy(amount: Decimal, slippage: Decimal) -> QuoteRequest {
    QuoteRequest {
        direction: SwapDirection::Buy,
        amount_in: amount,
        slippage,
        decimals: 9,
    }
}

fn sell(amount: Decimal, slippage: Decimal) -> QuoteRequest {
    QuoteRequest {
        direction: SwapDirection::Sell,
        amount_in: amount,
        slippage,
        decimals: 9,
    }
}

#[test]
fn first_buy_on_log_curve() {
    let engine = QuoteEngine::default();
    let quote = engine.quote(&launch_pool(), &buy(dec!(1), dec!(1))).unwrap();

    // 800M * ln(31/30) / ln(115/30), floored to 9 decimals
    assert_eq!(quote.quote.amount_out, 19_521_604_485_403_552);
    assert_eq!(quote.amount_out, dec!(19521604.485403552));
    assert_eq!(quote.liquidity_fee, dec!(0.01));
    assert_eq!(quote.quote.amount_in, LAMPORTS_PER_SOL);

    let expected_min = dec!(19521604.485403552) * dec!(0.99);
    assert!((quote.min_amount_out - expected_min).abs() <= dec!(0.000000001));
}

#[test]
fn steeper_curves_front_load_issuance() {
    let engine = QuoteEngine::default();
    let mut issued = Vec::new();

    for exponent in [dec!(1), dec!(1.5), dec!(2)] {
        let mut pool = launch_pool();
        pool.curve_exponent = exponent;
        let quote = engine.quote(&pool, &buy(dec!(1), dec!(0))).unwrap();
        issued.push(quote.amount_out);
    }

    assert!((issued[1] - dec!(26589885.0292)).abs() < dec!(0.001));
    assert!((issued[2] - dec!(34914611.0057)).abs() < dec!(0.001));
    assert!(issued[0] < issued[1] && issued[1] < issued[2]);
}

#[test]
fn buying_whole_headroom_issues_tradable_supply() {
    let engine = QuoteEngine::default();
    let pool = launch_pool();

    let quote = engine.quote(&pool, &buy(dec!(500), dec!(0))).unwrap();

    assert_eq!(quote.quote.amount_in, pool.target_raise);
    assert!(pool.tradable_token_supply - quote.quote.amount_out <= 1);
}

#[test]
fn buy_then_sell_returns_payment_less_fee() {
    let engine = QuoteEngine::default();
    let mut pool = launch_pool();
    pool.current_sol_raised = 20 * LAMPORTS_PER_SOL;

    let bought = engine.quote(&pool, &buy(dec!(2.5), dec!(0))).unwrap();

    pool.current_sol_raised += bought.quote.amount_in;
    let sold = engine.quote(&pool, &sell(bought.amount_out, dec!(0))).unwrap();

    let precision = derive_precision(9, dec!(1000000000), dec!(85), &pool.shape()).unwrap();
    let gross = Decimal::from(sold.quote.amount_out) / Decimal::from(LAMPORTS_PER_SOL);
    assert!((gross - dec!(2.5)).abs() <= precision.tolerance + dec!(0.000000002));
    assert!((sold.amount_out - dec!(2.475)).abs() <= precision.tolerance + dec!(0.000000002));
    assert!(sold.amount_out + sold.liquidity_fee <= gross + dec!(0.000000001));
}

#[test]
fn selling_every_token_drains_the_raise() {
    let engine = QuoteEngine::default();
    let mut pool = launch_pool();
    pool.current_sol_raised = 12_500_000_000;

    let quote = engine.quote(&pool, &sell(dec!(900000000), dec!(0))).unwrap();

    assert_eq!(quote.quote.amount_out, 12_500_000_000);
    assert_eq!(quote.amount_out, dec!(12.375));
    assert_eq!(quote.liquidity_fee, dec!(0.125));
}

#[test]
fn large_supply_pool_stays_accurate() {
    let engine = QuoteEngine::default();
    let mut pool = launch_pool();
    pool.tradable_token_supply = 8_000_000_000_000_000_000;
    pool.total_supply = 10_000_000_000_000_000_000;
    pool.current_sol_raised = 40 * LAMPORTS_PER_SOL;

    let bought = engine.quote(&pool, &buy(dec!(0.75), dec!(0))).unwrap();
    pool.current_sol_raised += bought.quote.amount_in;
    let sold = engine.quote(&pool, &sell(bought.amount_out, dec!(0))).unwrap();

    // Supplies above 10^18 raw units use the tightest tier
    let precision = derive_precision(9, dec!(10000000000), dec!(85), &pool.shape()).unwrap();
    assert!(precision.tolerance < dec!(0.0000001));

    let gross = Decimal::from(sold.quote.amount_out) / Decimal::from(LAMPORTS_PER_SOL);
    assert!((gross - dec!(0.75)).abs() <= precision.tolerance + dec!(0.000000002));
}

#[test]
fn quotes_are_deterministic() {
    let engine = QuoteEngine::default();
    let mut pool = launch_pool();
    pool.current_sol_raised = 33_333_333_333;
    pool.curve_exponent = dec!(1.5);

    let request = sell(dec!(4200000.123456789), dec!(3));
    let first = engine.quote(&pool, &request).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.quote(&pool, &request).unwrap(), first);
    }
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(QuoteEngine::default());
    let pool = Arc::new(launch_pool());
    let expected = engine.quote(&pool, &buy(dec!(1), dec!(1))).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let pool = Arc::clone(&pool);
            thread::spawn(move || engine.quote(&pool, &buy(dec!(1), dec!(1))).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn invalid_pool_is_rejected_before_math() {
    let engine = QuoteEngine::default();
    let mut pool = launch_pool();
    pool.curve_exponent = dec!(-1);

    let err = engine.quote(&pool, &buy(dec!(1), dec!(0))).unwrap_err();
    assert!(matches!(err, CurveError::InvalidInput { .. }));
}

#[test]
fn shape_rejects_non_positive_constant() {
    assert!(CurveShape::new(dec!(0), dec!(1)).is_err());
    assert!(CurveShape::new(dec!(-5), dec!(1)).is_err());
}
