//! Launch quoter entry point
//!
//! Reads a pool snapshot (JSON file or `-` for stdin), quotes a buy or sell
//! against it and prints the quote as JSON on stdout.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use launch_config::QuoterConfig;
use launch_curve::{
    Headroom, MarketMetrics, PoolSnapshot, QuoteEngine, QuoteRequest, SwapDirection, SwapQuote,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pool snapshot JSON file, or `-` for stdin
    #[arg(short, long, required_unless_present = "print_config")]
    pool: Option<PathBuf>,

    /// Trade direction: buy or sell
    #[arg(short, long, required_unless_present = "print_config")]
    direction: Option<SwapDirection>,

    /// SOL for buys, tokens for sells
    #[arg(short, long, required_unless_present = "print_config")]
    amount: Option<Decimal>,

    /// Slippage tolerance in percent (defaults to config)
    #[arg(short, long)]
    slippage: Option<Decimal>,

    /// Token mint decimals (defaults to config)
    #[arg(long)]
    decimals: Option<u32>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment overlay (config/environments/<name>.toml)
    #[arg(short, long, visible_alias = "env")]
    environment: Option<String>,

    /// Include market metrics alongside the quote
    #[arg(long)]
    metrics: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

/// Market figures reported with `--metrics`
#[derive(Debug, Serialize)]
struct MetricsReport {
    spot_price: Decimal,
    headroom: Headroom,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap_sol: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    virtual_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct QuoteOutput {
    #[serde(flatten)]
    quote: SwapQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsReport>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = QuoterConfig::load(args.config.as_deref(), args.environment.as_deref())
        .context("Failed to load configuration")?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    logging::init(&config.global)?;
    info!("Launch quoter v{}", env!("CARGO_PKG_VERSION"));
    debug!(environment = ?args.environment, "configuration loaded");

    let output = run(&args, &config)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

/// Quote the request described by `args`
fn run(args: &Args, config: &QuoterConfig) -> Result<QuoteOutput> {
    let pool_path = args.pool.as_deref().context("--pool is required")?;
    let pool = read_snapshot(pool_path)?;
    let request = build_request(args, config)?;

    let engine =
        QuoteEngine::new(config.engine.clone()).context("Invalid engine configuration")?;
    let quote = engine.quote(&pool, &request).with_context(|| {
        format!("Failed to quote {} of {}", request.direction, request.amount_in)
    })?;

    info!(
        direction = %request.direction,
        amount_in = %request.amount_in,
        amount_out = %quote.amount_out,
        min_amount_out = %quote.min_amount_out,
        fee = %quote.liquidity_fee,
        "quote ready"
    );

    let metrics = if args.metrics {
        Some(collect_metrics(&pool, request.decimals)?)
    } else {
        None
    };

    Ok(QuoteOutput { quote, metrics })
}

fn build_request(args: &Args, config: &QuoterConfig) -> Result<QuoteRequest> {
    Ok(QuoteRequest {
        direction: args.direction.context("--direction is required")?,
        amount_in: args.amount.context("--amount is required")?,
        slippage: args.slippage.unwrap_or(config.defaults.slippage),
        decimals: args.decimals.unwrap_or(config.defaults.decimals),
    })
}

fn read_snapshot(path: &Path) -> Result<PoolSnapshot> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read pool snapshot from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool snapshot {:?}", path))?
    };

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse pool snapshot {:?}", path))
}

fn collect_metrics(pool: &PoolSnapshot, decimals: u32) -> Result<MetricsReport> {
    let market_cap_sol = match MarketMetrics::market_cap_sol(pool) {
        Ok(cap) => Some(cap),
        Err(e) => {
            warn!("Market cap unavailable: {}", e);
            None
        }
    };
    let virtual_price = market_cap_sol
        .and_then(|_| MarketMetrics::virtual_price_per_token(pool, decimals).ok());

    Ok(MetricsReport {
        spot_price: MarketMetrics::spot_price(pool, decimals)?,
        headroom: MarketMetrics::headroom(pool)?,
        market_cap_sol,
        virtual_price,
    })
}
