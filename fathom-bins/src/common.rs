//! Shared bootstrap for the harness binaries.
//!
//! CLI surface and logging initialisation; model configuration is built
//! from the optional overrides with units applied here, so the core only
//! ever sees nanoseconds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fathom_core::candle::CandleConfig;
use fathom_core::model::PriceModelConfig;
use fathom_core::time::{NS_PER_MS, NS_PER_SEC};

/// Replay a recorded trade tape and check every emitted price estimate.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct ReplayArgs {
    /// Column of trade prices (packed little-endian i64)
    #[arg(long)]
    pub trade_prices: PathBuf,

    /// Column of trade times (packed little-endian u64 nanoseconds)
    #[arg(long)]
    pub trade_times: PathBuf,

    /// Column of evaluation times (packed little-endian u64 nanoseconds)
    #[arg(long)]
    pub eval_times: PathBuf,

    /// Column of expected prices (packed little-endian i64; 0 = no estimate)
    #[arg(long)]
    pub eval_prices: PathBuf,

    /// Column of expected confidence half-widths (packed little-endian f64;
    /// 0 = no estimate)
    #[arg(long)]
    pub eval_intervals: PathBuf,

    /// Relative tolerance on confidence comparisons
    #[arg(long)]
    pub conf_tolerance: Option<f64>,

    /// Annualised volatility used before the candle ring warms up
    #[arg(long)]
    pub init_volatility: Option<f64>,

    /// Floor on the confidence half-width
    #[arg(long)]
    pub min_interval: Option<f64>,

    /// Minimum projection slot in milliseconds
    #[arg(long)]
    pub min_slot_ms: Option<i64>,

    /// Staleness timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<i64>,

    /// Candle width in seconds
    #[arg(long)]
    pub candle_secs: Option<i64>,

    /// Historical candles used by the volatility estimate
    #[arg(long)]
    pub lookback: Option<usize>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl ReplayArgs {
    /// Price model configuration with defaults for unset flags.
    pub fn model_config(&self) -> PriceModelConfig {
        let mut config = PriceModelConfig::default();
        if let Some(value) = self.min_interval {
            config.min_interval = value;
        }
        if let Some(value) = self.init_volatility {
            config.init_volatility = value;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ns = ms * NS_PER_MS;
        }
        if let Some(ms) = self.min_slot_ms {
            config.min_slot_ns = ms * NS_PER_MS;
        }
        config
    }

    /// Candle ring configuration with defaults for unset flags.
    pub fn candle_config(&self) -> CandleConfig {
        let mut config = CandleConfig::default();
        if let Some(secs) = self.candle_secs {
            config.candle_ns = secs * NS_PER_SEC;
        }
        if let Some(lookback) = self.lookback {
            config.lookback = lookback;
        }
        config
    }
}

/// Initialize tracing/logging
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}
