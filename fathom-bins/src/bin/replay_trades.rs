//! Replays a recorded trade/evaluation tape against the price estimator
//! and exits non-zero on the first mismatch.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fathom_bins::column::FileColumn;
use fathom_bins::common::{init_logging, ReplayArgs};
use fathom_bins::replay::{run_replay, ReplayInputs, DEFAULT_CONF_TOLERANCE};
use fathom_core::model::StandardPriceModel;

fn main() -> Result<()> {
    let args = ReplayArgs::parse();
    init_logging(&args.log_level)?;

    let trade_times = FileColumn::<u64>::open(&args.trade_times)?;
    let trade_prices = FileColumn::<i64>::open(&args.trade_prices)?;
    let eval_times = FileColumn::<u64>::open(&args.eval_times)?;
    let eval_prices = FileColumn::<i64>::open(&args.eval_prices)?;
    let eval_confs = FileColumn::<f64>::open(&args.eval_intervals)?;

    let mut model = StandardPriceModel::new(args.model_config(), args.candle_config())?;
    let inputs = ReplayInputs {
        trade_times: &trade_times,
        trade_prices: &trade_prices,
        eval_times: &eval_times,
        eval_prices: &eval_prices,
        eval_confs: &eval_confs,
    };

    let tolerance = args.conf_tolerance.unwrap_or(DEFAULT_CONF_TOLERANCE);
    let report = run_replay(&mut model, &inputs, tolerance)?;

    info!(
        trades = report.trades_fed,
        evals = report.evals_checked,
        "replay passed"
    );
    Ok(())
}
