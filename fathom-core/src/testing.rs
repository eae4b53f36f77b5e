//! Test doubles for the model traits.

use crate::errors::ModelError;
use crate::time::Timestamp;
use crate::traits::VolatilityModel;
use crate::types::{PriceInterval, Trade};

/// Volatility model that ignores trades and always answers with the same
/// fixed value, or with no estimate at all.
///
/// Lets tests pin the volatility term of a price estimate, or exercise the
/// warm-up fallback without replaying enough candles to fill a real ring.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubVolatility {
    vol: Option<PriceInterval>,
}

impl StubVolatility {
    pub fn new(vol: Option<PriceInterval>) -> Self {
        Self { vol }
    }
}

impl VolatilityModel for StubVolatility {
    fn add_trade(&mut self, _trade: Trade) -> Result<(), ModelError> {
        Ok(())
    }

    fn eval_at_time(&mut self, _now: Timestamp) -> Result<Option<PriceInterval>, ModelError> {
        Ok(self.vol)
    }
}
