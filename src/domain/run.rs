//! The canonical outcome of one backtest run.

use serde::{Deserialize, Serialize};

use super::identity::StrategyIdentity;
use super::metric::Metric;

/// One backtest run's outcome.
///
/// Built once by the archive reader and never mutated afterwards. Fields the
/// archive did not report are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub strategy_name: String,
    pub timeframe: String,
    pub timerange: String,
    pub days_tested: Option<i64>,
    pub total_trades: u64,
    pub wins: u64,
    pub losses: u64,
    /// Winning trades as a percentage of all trades.
    pub win_rate: f64,
    pub total_profit_pct: f64,
    /// Total profit divided by the trade count (at least one).
    pub avg_profit_pct: f64,
    /// Absolute value; archives report drawdown with either sign.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub expectancy: f64,
    pub profit_factor: f64,
    pub cagr: f64,
    pub rejected_signals: u64,
    pub leverage: f64,
    pub has_tight_trailing_stop: bool,
}

impl RunMetrics {
    #[must_use]
    pub fn identity(&self) -> StrategyIdentity {
        StrategyIdentity::new(&self.strategy_name, &self.timeframe, &self.timerange)
    }

    /// The value of `metric` for this run.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalTrades => self.total_trades as f64,
            Metric::WinningTrades => self.wins as f64,
            Metric::LosingTrades => self.losses as f64,
            Metric::WinRate => self.win_rate,
            Metric::TotalProfitPct => self.total_profit_pct,
            Metric::AvgProfit => self.avg_profit_pct,
            Metric::MaxDrawdown => self.max_drawdown,
            Metric::SharpeRatio => self.sharpe_ratio,
            Metric::SortinoRatio => self.sortino_ratio,
            Metric::CalmarRatio => self.calmar_ratio,
            Metric::Expectancy => self.expectancy,
            Metric::ProfitFactor => self.profit_factor,
            Metric::Cagr => self.cagr,
            Metric::RejectedSignals => self.rejected_signals as f64,
        }
    }

    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.total_profit_pct > 0.0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.total_profit_pct < 0.0
    }
}
