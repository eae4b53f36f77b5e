//! Last-trade price estimator with volatility-scaled confidence.
//!
//! Tracks the most recent trade and the price range observed since the last
//! successful evaluation. Each query projects the volatility estimate over
//! the time elapsed since that trade, floors the result, and widens it by
//! the observed range so bursts between evaluations flare the interval out.

use tracing::trace;

use crate::candle::{CandleConfig, CandleModel};
use crate::errors::{ConfigError, ModelError};
use crate::time::{diff_times, Nanos, Timestamp, NS_PER_MS, NS_PER_SEC, NS_PER_YEAR};
use crate::traits::{PriceModel, VolatilityModel};
use crate::types::{as_interval, PriceEstimate, PriceInterval, PriceRange, Trade};

/// Configuration for [`StandardPriceModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceModelConfig {
    /// Floor on the emitted confidence half-width.
    pub min_interval: PriceInterval,
    /// Annualised volatility used until the volatility model warms up.
    pub init_volatility: PriceInterval,
    /// Maximum age of the last trade before evaluation declines to emit.
    pub timeout_ns: Nanos,
    /// Minimum elapsed time fed into the volatility projection.
    pub min_slot_ns: Nanos,
}

impl Default for PriceModelConfig {
    fn default() -> Self {
        Self {
            min_interval: 0.01,
            init_volatility: 1.0,
            timeout_ns: 60 * NS_PER_SEC,
            min_slot_ns: 500 * NS_PER_MS,
        }
    }
}

/// Price estimator composing a volatility model with last-trade state.
///
/// Generic over the volatility source so tests can pin the volatility term;
/// production use goes through [`StandardPriceModel::new`], which owns a
/// [`CandleModel`].
#[derive(Debug, Clone)]
pub struct StandardPriceModel<V = CandleModel> {
    vol_model: V,
    min_interval: PriceInterval,
    init_volatility: PriceInterval,
    timeout_ns: Nanos,
    min_slot_ns: Nanos,
    last_trade: Option<Trade>,
    range_since_eval: Option<PriceRange>,
}

impl StandardPriceModel<CandleModel> {
    /// Build with the default candle-ring volatility estimator.
    pub fn new(config: PriceModelConfig, candles: CandleConfig) -> Result<Self, ConfigError> {
        Self::with_volatility(CandleModel::new(candles)?, config)
    }
}

impl<V: VolatilityModel> StandardPriceModel<V> {
    /// Build around any volatility estimator.
    pub fn with_volatility(vol_model: V, config: PriceModelConfig) -> Result<Self, ConfigError> {
        if config.min_interval < 0.0 {
            return Err(ConfigError::NegativeMinInterval {
                value: config.min_interval,
            });
        }
        if config.init_volatility < 0.0 {
            return Err(ConfigError::NegativeInitVolatility {
                value: config.init_volatility,
            });
        }
        if config.min_slot_ns < 0 {
            return Err(ConfigError::NegativeMinSlot {
                min_slot_ns: config.min_slot_ns,
            });
        }
        if config.min_slot_ns >= config.timeout_ns {
            return Err(ConfigError::SlotNotBelowTimeout {
                min_slot_ns: config.min_slot_ns,
                timeout_ns: config.timeout_ns,
            });
        }

        Ok(Self {
            vol_model,
            min_interval: config.min_interval,
            init_volatility: config.init_volatility,
            timeout_ns: config.timeout_ns,
            min_slot_ns: config.min_slot_ns,
            last_trade: None,
            range_since_eval: None,
        })
    }

    /// Most recent trade fed into the model, if any.
    pub fn last_trade(&self) -> Option<Trade> {
        self.last_trade
    }

    /// The owned volatility estimator.
    pub fn volatility_model(&self) -> &V {
        &self.vol_model
    }
}

impl<V: VolatilityModel> PriceModel for StandardPriceModel<V> {
    fn add_trade(&mut self, trade: Trade) -> Result<(), ModelError> {
        self.vol_model.add_trade(trade)?;
        self.range_since_eval
            .get_or_insert_with(|| PriceRange::new(trade.price))
            .add_price(trade.price);
        self.last_trade = Some(trade);
        Ok(())
    }

    fn eval_at_time(&mut self, now: Timestamp) -> Result<Option<PriceEstimate>, ModelError> {
        let Some(last) = self.last_trade else {
            return Ok(None);
        };

        let elapsed = diff_times(now, last.time);
        if elapsed < 0 {
            return Err(ModelError::EvalBeforeLastTrade {
                now,
                last_trade_time: last.time,
            });
        }
        if elapsed > self.timeout_ns {
            // Stale: decline to project, but keep the accumulated range so
            // the next successful evaluation still covers the burst.
            trace!(elapsed, timeout_ns = self.timeout_ns, "last trade too old");
            return Ok(None);
        }

        let yearly_vol = self
            .vol_model
            .eval_at_time(now)?
            .unwrap_or(self.init_volatility);
        let slot = elapsed.max(self.min_slot_ns);
        let years = as_interval(slot) / as_interval(NS_PER_YEAR);

        let mut conf = yearly_vol * years.sqrt() * as_interval(last.price);
        conf = conf.max(self.min_interval);
        if let Some(range) = self.range_since_eval.take() {
            conf = conf.max(range.interval());
        }

        Ok(Some(PriceEstimate {
            price: last.price,
            conf,
        }))
    }
}
