//! Error types for model construction and streaming updates.
//!
//! Every variant carries the values involved so the rendered diagnostic
//! names the broken precondition directly. Warm-up, staleness and
//! no-trades-yet are not errors; the evaluation path reports those as
//! `Ok(None)`.

use std::fmt;

use crate::time::{Nanos, Timestamp};
use crate::types::PriceInterval;

/// Rejected model configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The candle ring needs at least one historical candle.
    ZeroLookback,

    /// Candle buckets must have positive width.
    NonPositiveCandleDuration {
        candle_ns: Nanos,
    },

    /// The confidence floor cannot be negative.
    NegativeMinInterval {
        value: PriceInterval,
    },

    /// The warm-up volatility fallback cannot be negative.
    NegativeInitVolatility {
        value: PriceInterval,
    },

    /// The minimum projection slot cannot be negative.
    NegativeMinSlot {
        min_slot_ns: Nanos,
    },

    /// The minimum projection slot must stay below the staleness timeout.
    SlotNotBelowTimeout {
        min_slot_ns: Nanos,
        timeout_ns: Nanos,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLookback => {
                write!(f, "lookback must be at least 1 candle")
            }
            ConfigError::NonPositiveCandleDuration { candle_ns } => {
                write!(f, "candle duration must be positive, got {}ns", candle_ns)
            }
            ConfigError::NegativeMinInterval { value } => {
                write!(f, "minimum confidence interval must be >= 0, got {}", value)
            }
            ConfigError::NegativeInitVolatility { value } => {
                write!(f, "initial volatility must be >= 0, got {}", value)
            }
            ConfigError::NegativeMinSlot { min_slot_ns } => {
                write!(f, "minimum slot must be >= 0, got {}ns", min_slot_ns)
            }
            ConfigError::SlotNotBelowTimeout {
                min_slot_ns,
                timeout_ns,
            } => {
                write!(
                    f,
                    "minimum slot {}ns must be below staleness timeout {}ns",
                    min_slot_ns, timeout_ns
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Broken input contract on a streaming update or evaluation.
///
/// These are fatal: the caller fed the model out-of-order or degenerate
/// data and the process is expected to stop with the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelError {
    /// A trade's candle bucket starts before the current front candle.
    /// Trades must arrive in non-decreasing time order.
    TradeBeforeCandle {
        time: Timestamp,
        bucket_start: Timestamp,
        front_start: Timestamp,
    },

    /// Evaluation time precedes the most recent trade.
    EvalBeforeLastTrade {
        now: Timestamp,
        last_trade_time: Timestamp,
    },

    /// A candle low must be positive for the log-ratio to be defined.
    NonPositiveCandleLow {
        low: PriceInterval,
    },

    /// Adjacent candles must span a positive amount of time.
    EmptyCandleSpan {
        cur_end: Timestamp,
        prev_start: Timestamp,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::TradeBeforeCandle {
                time,
                bucket_start,
                front_start,
            } => {
                write!(
                    f,
                    "trade at {}ns falls in bucket {}ns before current candle {}ns (non-monotone input)",
                    time, bucket_start, front_start
                )
            }
            ModelError::EvalBeforeLastTrade {
                now,
                last_trade_time,
            } => {
                write!(
                    f,
                    "evaluation at {}ns precedes last trade at {}ns",
                    now, last_trade_time
                )
            }
            ModelError::NonPositiveCandleLow { low } => {
                write!(f, "candle low {} is not positive", low)
            }
            ModelError::EmptyCandleSpan {
                cur_end,
                prev_start,
            } => {
                write!(
                    f,
                    "candle ending at {}ns does not extend past previous start {}ns",
                    cur_end, prev_start
                )
            }
        }
    }
}

impl std::error::Error for ModelError {}
