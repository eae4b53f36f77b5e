//! Fathom Core - Streaming Price and Volatility Estimation
//!
//! An online price estimator for a monotone stream of trades. Two models
//! cooperate:
//!
//! - [`CandleModel`] aggregates trades into a fixed-capacity ring of
//!   high/low candles and produces an annualised Parkinson-style
//!   volatility once the ring is full.
//! - [`StandardPriceModel`] tracks the last trade and the price range
//!   observed since the previous evaluation, and composes both with the
//!   volatility estimate into a `(price, confidence)` pair.
//!
//! All state is single-owner and process-local; every operation is
//! synchronous and must be invoked in non-decreasing timestamp order.
//!
//! ## Usage Example
//!
//! ```rust
//! use fathom_core::prelude::*;
//!
//! let mut model = StandardPriceModel::new(
//!     PriceModelConfig::default(),
//!     CandleConfig::default(),
//! )?;
//!
//! model.add_trade(Trade { price: 100, time: 0 })?;
//! if let Some(estimate) = model.eval_at_time(1_000_000_000)? {
//!     assert_eq!(estimate.price, 100);
//!     assert!(estimate.conf >= 0.01);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod candle;
pub mod errors;
pub mod model;
pub mod testing;
pub mod time;
pub mod traits;
pub mod types;

#[cfg(test)]
mod ring_proptest;

// Re-export the model surface
pub use candle::{CandleConfig, CandleModel};
pub use errors::{ConfigError, ModelError};
pub use model::{PriceModelConfig, StandardPriceModel};
pub use time::{Nanos, Timestamp};
pub use traits::{PriceModel, VolatilityModel};
pub use types::{PriceEstimate, PriceInterval, PriceRange, PriceVal, Trade};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::candle::{CandleConfig, CandleModel};
    pub use crate::errors::{ConfigError, ModelError};
    pub use crate::model::{PriceModelConfig, StandardPriceModel};
    pub use crate::time::{Nanos, Timestamp};
    pub use crate::traits::{PriceModel, VolatilityModel};
    pub use crate::types::{PriceEstimate, PriceInterval, PriceRange, PriceVal, Trade};
}
