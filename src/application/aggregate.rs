//! Cross-run aggregation for one strategy identity.
//!
//! Aggregation is a pure function of the run list: the same runs in any
//! order produce the same [`RunAggregate`].

use crate::domain::stats::median;
use crate::domain::{Metric, MetricSet, RunMetrics, StrategyIdentity};

/// Median statistics and derived values for one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RunAggregate {
    pub identity: StrategyIdentity,
    pub total_backtests: u32,
    pub medians: MetricSet,
    /// Share of runs with positive total profit, in percent.
    ///
    /// Counted from runs rather than medianed from per-run rates.
    pub backtest_win_percentage: f64,
    pub leverage: f64,
    pub days_tested: Option<i64>,
    pub has_tight_trailing_stop: bool,
}

impl RunAggregate {
    #[must_use]
    pub fn median(&self, metric: Metric) -> f64 {
        self.medians.get(metric)
    }
}

/// Collapse `runs` into one aggregate for `identity`.
///
/// Zero runs yield zero medians and a zero win percentage.
#[must_use]
pub fn aggregate(identity: StrategyIdentity, runs: &[RunMetrics]) -> RunAggregate {
    let medians = MetricSet::from_fn(|metric| {
        let values: Vec<f64> = runs.iter().map(|run| run.metric(metric)).collect();
        median(&values)
    });

    let backtest_win_percentage = if runs.is_empty() {
        0.0
    } else {
        let profitable = runs.iter().filter(|run| run.is_profitable()).count();
        100.0 * profitable as f64 / runs.len() as f64
    };

    let leverage = runs
        .iter()
        .map(|run| run.leverage)
        .filter(|l| l.is_finite())
        .fold(None, |acc: Option<f64>, l| Some(acc.map_or(l, |a| a.max(l))))
        .unwrap_or(1.0);

    RunAggregate {
        identity,
        total_backtests: u32::try_from(runs.len()).unwrap_or(u32::MAX),
        medians,
        backtest_win_percentage,
        leverage,
        days_tested: runs.iter().filter_map(|run| run.days_tested).max(),
        has_tight_trailing_stop: runs.iter().any(|run| run.has_tight_trailing_stop),
    }
}
