//! Stall heuristics over an identity's runs.

use crate::domain::stats::mean;
use crate::domain::{RunMetrics, StallReason};

/// Minimum run count before the negative-share rule applies.
pub const NEGATIVE_SHARE_MIN_RUNS: usize = 12;
/// Share of negative runs, in percent, that stalls a well-sampled strategy.
pub const NEGATIVE_SHARE_PCT: f64 = 90.0;
/// Mean total profit below which an always-negative strategy stalls.
pub const NEGATIVE_MEAN_PROFIT: f64 = -0.30;

/// First stall reason that applies, or `None` for a healthy strategy.
///
/// Rules are checked in priority order: no trades, lookahead bias, mostly
/// negative over many runs, consistently negative.
#[must_use]
pub fn classify_stall(runs: &[RunMetrics], biased: bool) -> Option<StallReason> {
    if runs.iter().all(|run| run.total_trades == 0) {
        return Some(StallReason::NoTrades);
    }
    if biased {
        return Some(StallReason::Biased);
    }

    let negative = runs.iter().filter(|run| run.is_negative()).count();
    if runs.len() >= NEGATIVE_SHARE_MIN_RUNS
        && 100.0 * negative as f64 / runs.len() as f64 >= NEGATIVE_SHARE_PCT
    {
        return Some(StallReason::NinetyPercentNegative);
    }

    let profits: Vec<f64> = runs.iter().map(|run| run.total_profit_pct).collect();
    if negative == runs.len() && mean(&profits) < NEGATIVE_MEAN_PROFIT {
        return Some(StallReason::Negative);
    }

    None
}
