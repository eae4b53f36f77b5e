//! Candle-ring volatility estimator.
//!
//! Aggregates tick trades into fixed-width high/low candles and derives an
//! annualised Parkinson-style volatility from the trailing window. Buckets
//! with no trades are never stored; the pairwise merge in the estimate
//! bridges the gaps, so sparse tapes still produce a full high-low span.

use tracing::{debug, trace};

use crate::errors::{ConfigError, ModelError};
use crate::time::{add_time, diff_times, floor_time, Nanos, Timestamp, NS_PER_MIN, NS_PER_YEAR};
use crate::traits::VolatilityModel;
use crate::types::{as_interval, PriceInterval, Trade};

/// Configuration for [`CandleModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleConfig {
    /// Historical candles kept in addition to the current one.
    pub lookback: usize,
    /// Width of one candle bucket in nanoseconds.
    pub candle_ns: Nanos,
}

impl Default for CandleConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            candle_ns: NS_PER_MIN,
        }
    }
}

/// Fixed-capacity ring of `(start, high, low)` candles, newest at `front`.
///
/// Three parallel arrays keep the rotate-and-widen write path branch-light
/// and the pairwise read path contiguous. Candle starts are strictly
/// decreasing from front to back, and the front candle always covers the
/// bucket of the most recent trade.
#[derive(Debug, Clone)]
pub struct CandleModel {
    capacity: usize,
    candle_ns: Nanos,
    count: usize,
    front: usize,
    starts: Vec<Timestamp>,
    highs: Vec<PriceInterval>,
    lows: Vec<PriceInterval>,
}

impl CandleModel {
    pub fn new(config: CandleConfig) -> Result<Self, ConfigError> {
        if config.lookback == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if config.candle_ns <= 0 {
            return Err(ConfigError::NonPositiveCandleDuration {
                candle_ns: config.candle_ns,
            });
        }

        // Current candle plus the trailing lookback window.
        let capacity = config.lookback + 1;
        Ok(Self {
            capacity,
            candle_ns: config.candle_ns,
            count: 0,
            front: 0,
            starts: vec![0; capacity],
            highs: vec![0.0; capacity],
            lows: vec![0.0; capacity],
        })
    }

    /// Candle buckets currently held; saturates at `lookback + 1`.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once the trailing window is fully populated.
    pub fn is_warmed(&self) -> bool {
        self.count == self.capacity
    }

    /// Bucket start of the newest candle, if any trade has been seen.
    pub fn front_start(&self) -> Option<Timestamp> {
        (self.count > 0).then(|| self.starts[self.front])
    }

    /// Bucket starts from newest to oldest.
    pub fn starts(&self) -> impl Iterator<Item = Timestamp> + '_ {
        (0..self.count).map(|i| self.starts[(self.front + i) % self.capacity])
    }

    /// High/low pairs from newest to oldest.
    pub fn ranges(&self) -> impl Iterator<Item = (PriceInterval, PriceInterval)> + '_ {
        (0..self.count).map(|i| {
            let slot = (self.front + i) % self.capacity;
            (self.highs[slot], self.lows[slot])
        })
    }

    /// Parkinson-style annualised volatility over the trailing window.
    ///
    /// Adjacent candles are merged pairwise: each term spans from the
    /// previous candle's start to the current candle's end, with the high
    /// and low taken over both buckets. `None` until the ring is full.
    pub fn eval_volatility(&self) -> Result<Option<PriceInterval>, ModelError> {
        if self.count < self.capacity {
            return Ok(None);
        }

        let mut numer = 0.0;
        let mut denom = 0.0;

        for i in 0..self.count - 1 {
            let cur = (self.front + i) % self.capacity;
            let prev = (cur + 1) % self.capacity;

            let max_high = self.highs[cur].max(self.highs[prev]);
            let min_low = self.lows[cur].min(self.lows[prev]);
            if min_low <= 0.0 {
                return Err(ModelError::NonPositiveCandleLow { low: min_low });
            }
            debug_assert!(min_low <= max_high);

            let log_ratio = (max_high / min_low).ln();
            numer += log_ratio * log_ratio;

            let prev_start = self.starts[prev];
            let cur_end = add_time(self.starts[cur], self.candle_ns);
            if cur_end <= prev_start {
                return Err(ModelError::EmptyCandleSpan {
                    cur_end,
                    prev_start,
                });
            }
            denom += as_interval(diff_times(cur_end, prev_start));
        }

        denom *= 4.0 * std::f64::consts::LN_2;
        Ok(Some((numer / denom * as_interval(NS_PER_YEAR)).sqrt()))
    }
}

impl VolatilityModel for CandleModel {
    fn add_trade(&mut self, trade: Trade) -> Result<(), ModelError> {
        let price = as_interval(trade.price);
        let start = floor_time(trade.time, self.candle_ns);

        if self.count == 0 || start > self.starts[self.front] {
            // Rotate: the oldest slot becomes the new front.
            self.front = (self.front + self.capacity - 1) % self.capacity;
            let was_warming = self.count < self.capacity;
            self.count = (self.count + 1).min(self.capacity);
            self.starts[self.front] = start;
            self.highs[self.front] = price;
            self.lows[self.front] = price;
            trace!(start, count = self.count, "opened candle");
            if was_warming && self.count == self.capacity {
                debug!(candles = self.count, "volatility window filled");
            }
        }

        if start != self.starts[self.front] {
            return Err(ModelError::TradeBeforeCandle {
                time: trade.time,
                bucket_start: start,
                front_start: self.starts[self.front],
            });
        }

        self.highs[self.front] = self.highs[self.front].max(price);
        self.lows[self.front] = self.lows[self.front].min(price);
        Ok(())
    }

    fn eval_at_time(&mut self, _now: Timestamp) -> Result<Option<PriceInterval>, ModelError> {
        self.eval_volatility()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NS_PER_SEC;

    fn model(lookback: usize, candle_ns: Nanos) -> CandleModel {
        CandleModel::new(CandleConfig {
            lookback,
            candle_ns,
        })
        .unwrap()
    }

    fn trade(price: i64, time: Timestamp) -> Trade {
        Trade { price, time }
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let err = CandleModel::new(CandleConfig {
            lookback: 0,
            candle_ns: NS_PER_SEC,
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroLookback);

        let err = CandleModel::new(CandleConfig {
            lookback: 5,
            candle_ns: 0,
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveCandleDuration { candle_ns: 0 });
    }

    #[test]
    fn test_same_bucket_trades_build_one_candle() {
        let mut model = model(3, NS_PER_MIN);
        for (price, ms) in [(100, 0), (130, 100), (90, 200), (110, 300)] {
            model.add_trade(trade(price, ms * 1_000_000)).unwrap();
        }

        assert_eq!(model.len(), 1);
        assert_eq!(model.front_start(), Some(0));
        let (high, low) = model.ranges().next().unwrap();
        assert_eq!((high, low), (130.0, 90.0));
    }

    #[test]
    fn test_front_tracks_latest_bucket() {
        let mut model = model(2, NS_PER_SEC);
        model.add_trade(trade(100, 0)).unwrap();
        model.add_trade(trade(101, NS_PER_SEC as Timestamp)).unwrap();
        // A gap of several empty buckets is fine; the front jumps forward.
        model
            .add_trade(trade(102, 10 * NS_PER_SEC as Timestamp))
            .unwrap();

        assert_eq!(model.front_start(), Some(10 * NS_PER_SEC as Timestamp));
        let starts: Vec<_> = model.starts().collect();
        assert_eq!(
            starts,
            vec![
                10 * NS_PER_SEC as Timestamp,
                NS_PER_SEC as Timestamp,
                0
            ]
        );
    }

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut model = model(1, NS_PER_SEC);
        for bucket in 0..5u64 {
            model
                .add_trade(trade(100 + bucket as i64, bucket * NS_PER_SEC as Timestamp))
                .unwrap();
        }

        assert_eq!(model.len(), 2);
        let starts: Vec<_> = model.starts().collect();
        assert_eq!(
            starts,
            vec![4 * NS_PER_SEC as Timestamp, 3 * NS_PER_SEC as Timestamp]
        );
    }

    #[test]
    fn test_trade_before_front_bucket_is_rejected() {
        let mut model = model(2, NS_PER_SEC);
        model
            .add_trade(trade(100, 10 * NS_PER_SEC as Timestamp))
            .unwrap();

        let err = model
            .add_trade(trade(100, 5 * NS_PER_SEC as Timestamp))
            .unwrap_err();
        assert!(matches!(err, ModelError::TradeBeforeCandle { .. }));
    }

    #[test]
    fn test_warm_up_returns_none_until_full() {
        let mut model = model(2, NS_PER_SEC);
        assert_eq!(model.eval_volatility().unwrap(), None);

        model.add_trade(trade(100, 0)).unwrap();
        assert_eq!(model.eval_volatility().unwrap(), None);

        model.add_trade(trade(101, NS_PER_SEC as Timestamp)).unwrap();
        assert_eq!(model.eval_volatility().unwrap(), None);
        assert!(!model.is_warmed());

        model
            .add_trade(trade(102, 2 * NS_PER_SEC as Timestamp))
            .unwrap();
        assert!(model.is_warmed());
        assert!(model.eval_volatility().unwrap().is_some());
    }

    #[test]
    fn test_two_candle_volatility_value() {
        let mut model = model(1, NS_PER_SEC);
        model.add_trade(trade(100, 0)).unwrap();
        model.add_trade(trade(110, NS_PER_SEC as Timestamp)).unwrap();

        let vol = model.eval_volatility().unwrap().unwrap();

        // One merged pair: high 110, low 100, spanning the two seconds from
        // the older candle's start to the newer candle's end.
        let log_ratio = (110.0f64 / 100.0).ln();
        let span_ns = 2.0 * NS_PER_SEC as f64;
        let expected = (log_ratio * log_ratio / (span_ns * 4.0 * std::f64::consts::LN_2)
            * NS_PER_YEAR as f64)
            .sqrt();
        assert!((vol - expected).abs() <= expected * 1e-12);
    }

    #[test]
    fn test_flat_tape_has_zero_volatility() {
        let mut model = model(2, NS_PER_SEC);
        for bucket in 0..3u64 {
            model
                .add_trade(trade(500, bucket * NS_PER_SEC as Timestamp))
                .unwrap();
        }
        assert_eq!(model.eval_volatility().unwrap(), Some(0.0));
    }

    #[test]
    fn test_zero_price_candle_is_rejected_at_eval() {
        let mut model = model(1, NS_PER_SEC);
        model.add_trade(trade(0, 0)).unwrap();
        model.add_trade(trade(100, NS_PER_SEC as Timestamp)).unwrap();

        let err = model.eval_volatility().unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveCandleLow { .. }));
    }

    #[test]
    fn test_eval_at_time_ignores_query_time() {
        let mut model = model(1, NS_PER_SEC);
        model.add_trade(trade(100, 0)).unwrap();
        model.add_trade(trade(110, NS_PER_SEC as Timestamp)).unwrap();

        let direct = model.eval_volatility().unwrap();
        let at_time = model.eval_at_time(12_345).unwrap();
        assert_eq!(direct, at_time);
    }
}
