//! Deterministic replay of a trade/evaluation tape against a price model.
//!
//! Trades and evaluations arrive as separate monotone columns. The driver
//! merges them in time order, feeding each trade to the model and checking
//! each evaluation against the expected tape. On a shared timestamp the
//! evaluation runs first, so an evaluation only ever sees strictly-earlier
//! trades.

use anyhow::{ensure, Result};
use tracing::debug;

use fathom_core::time::Timestamp;
use fathom_core::traits::PriceModel;
use fathom_core::types::Trade;

use crate::column::Column;

/// Default relative tolerance on confidence comparisons.
pub const DEFAULT_CONF_TOLERANCE: f64 = 1e-5;

/// The five columns of one replay tape.
///
/// `eval_prices`/`eval_confs` carry the expected output per evaluation; a
/// `(0, 0)` pair is the sentinel for "no estimate expected".
pub struct ReplayInputs<'a> {
    pub trade_times: &'a dyn Column<u64>,
    pub trade_prices: &'a dyn Column<i64>,
    pub eval_times: &'a dyn Column<u64>,
    pub eval_prices: &'a dyn Column<i64>,
    pub eval_confs: &'a dyn Column<f64>,
}

/// Counts of work performed by a completed replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub trades_fed: usize,
    pub evals_checked: usize,
}

impl ReplayInputs<'_> {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.trade_times.len() == self.trade_prices.len(),
            "trade columns disagree: {} times vs {} prices",
            self.trade_times.len(),
            self.trade_prices.len()
        );
        ensure!(
            self.eval_times.len() == self.eval_prices.len(),
            "eval columns disagree: {} times vs {} prices",
            self.eval_times.len(),
            self.eval_prices.len()
        );
        ensure!(
            self.eval_times.len() == self.eval_confs.len(),
            "eval columns disagree: {} times vs {} intervals",
            self.eval_times.len(),
            self.eval_confs.len()
        );

        for i in 1..self.trade_times.len() {
            let (prev, cur) = (self.trade_times.get(i - 1), self.trade_times.get(i));
            ensure!(
                prev <= cur,
                "trade times not monotone at index {}: {} > {}",
                i,
                prev,
                cur
            );
        }
        for i in 1..self.eval_times.len() {
            let (prev, cur) = (self.eval_times.get(i - 1), self.eval_times.get(i));
            ensure!(
                prev <= cur,
                "eval times not monotone at index {}: {} > {}",
                i,
                prev,
                cur
            );
        }
        for i in 0..self.eval_confs.len() {
            let conf = self.eval_confs.get(i);
            ensure!(
                conf >= 0.0,
                "expected interval at index {} is negative: {}",
                i,
                conf
            );
        }
        Ok(())
    }
}

/// Run the tape through `model`, checking every evaluation within
/// `conf_tolerance` relative tolerance.
pub fn run_replay<M: PriceModel>(
    model: &mut M,
    inputs: &ReplayInputs<'_>,
    conf_tolerance: f64,
) -> Result<ReplayReport> {
    inputs.validate()?;

    let trade_count = inputs.trade_times.len();
    let eval_count = inputs.eval_times.len();
    let mut trade_idx = 0;
    let mut eval_idx = 0;

    loop {
        let eval_time = if eval_idx < eval_count {
            inputs.eval_times.get(eval_idx)
        } else {
            Timestamp::MAX
        };

        if trade_idx < trade_count && eval_time > inputs.trade_times.get(trade_idx) {
            model.add_trade(Trade {
                price: inputs.trade_prices.get(trade_idx),
                time: inputs.trade_times.get(trade_idx),
            })?;
            trade_idx += 1;
        } else if eval_idx < eval_count {
            let expected_price = inputs.eval_prices.get(eval_idx);
            let expected_conf = inputs.eval_confs.get(eval_idx);

            match model.eval_at_time(eval_time)? {
                Some(actual) => {
                    ensure!(
                        actual.price == expected_price,
                        "eval {} at {}ns: price {} != expected {}",
                        eval_idx,
                        eval_time,
                        actual.price,
                        expected_price
                    );
                    ensure!(
                        actual.conf >= expected_conf * (1.0 - conf_tolerance),
                        "eval {} at {}ns: conf {} below expected {} (rtol {})",
                        eval_idx,
                        eval_time,
                        actual.conf,
                        expected_conf,
                        conf_tolerance
                    );
                    ensure!(
                        actual.conf <= expected_conf * (1.0 + conf_tolerance),
                        "eval {} at {}ns: conf {} above expected {} (rtol {})",
                        eval_idx,
                        eval_time,
                        actual.conf,
                        expected_conf,
                        conf_tolerance
                    );
                }
                None => {
                    ensure!(
                        expected_price == 0 && expected_conf == 0.0,
                        "eval {} at {}ns: no estimate, but tape expects price {} conf {}",
                        eval_idx,
                        eval_time,
                        expected_price,
                        expected_conf
                    );
                }
            }
            eval_idx += 1;
        } else {
            break;
        }
    }

    debug!(trades_fed = trade_idx, evals_checked = eval_idx, "tape drained");
    Ok(ReplayReport {
        trades_fed: trade_idx,
        evals_checked: eval_idx,
    })
}
