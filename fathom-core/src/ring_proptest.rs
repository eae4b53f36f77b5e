//! Property-based tests for the price range and the candle ring.
//!
//! Randomized monotone tapes catch ordering and widening edge cases that
//! hand-written unit tests miss.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::candle::{CandleConfig, CandleModel};
    use crate::time::{floor_time, Timestamp, NS_PER_SEC};
    use crate::traits::VolatilityModel;
    use crate::types::{PriceRange, Trade};

    fn monotone_tape() -> impl Strategy<Value = Vec<(i64, Timestamp)>> {
        // Positive prices and non-decreasing times built from gap deltas.
        prop::collection::vec((1i64..1_000_000, 0u64..10 * NS_PER_SEC as u64), 1..200).prop_map(
            |pairs| {
                let mut time = 0u64;
                pairs
                    .into_iter()
                    .map(|(price, gap)| {
                        time += gap;
                        (price, time)
                    })
                    .collect()
            },
        )
    }

    #[test]
    fn prop_range_covers_every_added_price() {
        proptest!(|(prices in prop::collection::vec(-1_000_000i64..1_000_000, 1..100))| {
            let mut range = PriceRange::new(prices[0]);
            for &p in &prices[1..] {
                range.add_price(p);
            }

            let min = *prices.iter().min().unwrap();
            let max = *prices.iter().max().unwrap();
            prop_assert_eq!(range.low(), min);
            prop_assert_eq!(range.high(), max);
            prop_assert!(range.interval() >= 0.0);
            prop_assert_eq!(range.interval(), (max - min) as f64 / 2.0);
        });
    }

    #[test]
    fn prop_range_single_add_is_half_distance() {
        proptest!(|(open in -1_000_000i64..1_000_000, p in -1_000_000i64..1_000_000)| {
            let mut range = PriceRange::new(open);
            range.add_price(p);
            prop_assert_eq!(range.interval(), (p - open).abs() as f64 / 2.0);
        });
    }

    #[test]
    fn prop_candle_front_tracks_latest_trade() {
        proptest!(|(tape in monotone_tape(), lookback in 1usize..8)| {
            let candle_ns = NS_PER_SEC;
            let mut model = CandleModel::new(CandleConfig { lookback, candle_ns }).unwrap();

            for &(price, time) in &tape {
                model.add_trade(Trade { price, time }).unwrap();
                prop_assert_eq!(
                    model.front_start(),
                    Some(floor_time(time, candle_ns))
                );
            }

            prop_assert!(model.len() <= lookback + 1);

            // Starts strictly decrease from front to back.
            let starts: Vec<_> = model.starts().collect();
            for pair in starts.windows(2) {
                prop_assert!(pair[0] > pair[1]);
            }

            // Every candle still satisfies low <= high.
            for (high, low) in model.ranges() {
                prop_assert!(low <= high);
            }
        });
    }

    #[test]
    fn prop_warmed_ring_evaluates_with_positive_prices() {
        proptest!(|(tape in monotone_tape(), lookback in 1usize..4)| {
            let candle_ns = NS_PER_SEC;
            let mut model = CandleModel::new(CandleConfig { lookback, candle_ns }).unwrap();

            for &(price, time) in &tape {
                model.add_trade(Trade { price, time }).unwrap();
            }

            // Warm-up is exactly "ring full", and a full ring of positive
            // prices always evaluates to a finite non-negative volatility.
            let vol = model.eval_volatility().unwrap();
            prop_assert_eq!(vol.is_some(), model.is_warmed());
            if let Some(v) = vol {
                prop_assert!(v.is_finite());
                prop_assert!(v >= 0.0);
            }
        });
    }
}
