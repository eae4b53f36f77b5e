//! Capability traits for streaming trade trackers.
//!
//! Both traits share the same shape: ingest trades in non-decreasing time
//! order, answer point-in-time queries. `Ok(None)` from a query means the
//! model declines to estimate (warm-up, no trades yet, stale input); an
//! `Err` means the caller broke an input precondition.

use crate::errors::ModelError;
use crate::time::Timestamp;
use crate::types::{PriceEstimate, PriceInterval, Trade};

/// An online estimator answering with an annualised volatility scalar.
pub trait VolatilityModel {
    fn add_trade(&mut self, trade: Trade) -> Result<(), ModelError>;

    fn eval_at_time(&mut self, now: Timestamp) -> Result<Option<PriceInterval>, ModelError>;
}

/// An online estimator answering with a `(price, confidence)` pair.
pub trait PriceModel {
    fn add_trade(&mut self, trade: Trade) -> Result<(), ModelError>;

    fn eval_at_time(&mut self, now: Timestamp) -> Result<Option<PriceEstimate>, ModelError>;
}
