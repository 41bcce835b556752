//! Numeric backtest metrics and per-metric value sets.
//!
//! [`Metric`] is the closed set of numeric fields that every run reports and
//! that aggregation medians across runs. [`MetricSet`] holds one value per
//! metric; it is the shape of both the medians stored on a rating and the
//! input to the score calculator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric per-run metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    TotalTrades,
    WinningTrades,
    LosingTrades,
    WinRate,
    TotalProfitPct,
    AvgProfit,
    MaxDrawdown,
    SharpeRatio,
    SortinoRatio,
    CalmarRatio,
    Expectancy,
    ProfitFactor,
    Cagr,
    RejectedSignals,
}

impl Metric {
    /// Every metric, in storage order.
    pub const ALL: [Metric; 14] = [
        Metric::TotalTrades,
        Metric::WinningTrades,
        Metric::LosingTrades,
        Metric::WinRate,
        Metric::TotalProfitPct,
        Metric::AvgProfit,
        Metric::MaxDrawdown,
        Metric::SharpeRatio,
        Metric::SortinoRatio,
        Metric::CalmarRatio,
        Metric::Expectancy,
        Metric::ProfitFactor,
        Metric::Cagr,
        Metric::RejectedSignals,
    ];

    /// Canonical snake_case name, without the `median_` prefix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Metric::TotalTrades => "total_trades",
            Metric::WinningTrades => "winning_trades",
            Metric::LosingTrades => "losing_trades",
            Metric::WinRate => "win_rate",
            Metric::TotalProfitPct => "total_profit_pct",
            Metric::AvgProfit => "avg_profit",
            Metric::MaxDrawdown => "max_drawdown",
            Metric::SharpeRatio => "sharpe_ratio",
            Metric::SortinoRatio => "sortino_ratio",
            Metric::CalmarRatio => "calmar_ratio",
            Metric::Expectancy => "expectancy",
            Metric::ProfitFactor => "profit_factor",
            Metric::Cagr => "cagr",
            Metric::RejectedSignals => "rejected_signals",
        }
    }

    /// Resolve a metric from its canonical name or a known alias.
    ///
    /// Accepts an optional `median_` or `avg_` prefix, so `median_buys`,
    /// `total_trades` and `avg_tot_profit_pct` all resolve.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let bare = name
            .strip_prefix("median_")
            .or_else(|| name.strip_prefix("avg_"))
            .unwrap_or(&name);

        let metric = match bare {
            "total_trades" | "trades" | "buys" => Metric::TotalTrades,
            "winning_trades" | "wins" => Metric::WinningTrades,
            "losing_trades" | "losses" => Metric::LosingTrades,
            "win_rate" | "winrate" | "win_pct" => Metric::WinRate,
            "total_profit_pct" | "tot_profit_pct" | "profit_total_pct" | "roi" => {
                Metric::TotalProfitPct
            }
            "avg_profit" | "avg_profit_pct" | "profit_pct" | "prof" | "profit" => {
                Metric::AvgProfit
            }
            "max_drawdown" | "dd_pct" | "drawdown" => Metric::MaxDrawdown,
            "sharpe_ratio" | "sharpe" => Metric::SharpeRatio,
            "sortino_ratio" | "sortino" => Metric::SortinoRatio,
            "calmar_ratio" | "calmar" => Metric::CalmarRatio,
            "expectancy" => Metric::Expectancy,
            "profit_factor" => Metric::ProfitFactor,
            "cagr" => Metric::Cagr,
            "rejected_signals" => Metric::RejectedSignals,
            _ => return None,
        };
        Some(metric)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`Metric`].
///
/// Serialized with `median_` prefixed field names because the only persisted
/// instance is the set of medians on a rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(rename = "median_total_trades", default)]
    pub total_trades: f64,
    #[serde(rename = "median_winning_trades", default)]
    pub winning_trades: f64,
    #[serde(rename = "median_losing_trades", default)]
    pub losing_trades: f64,
    #[serde(rename = "median_win_rate", default)]
    pub win_rate: f64,
    #[serde(rename = "median_total_profit_pct", default)]
    pub total_profit_pct: f64,
    #[serde(rename = "median_avg_profit", default)]
    pub avg_profit: f64,
    #[serde(rename = "median_max_drawdown", default)]
    pub max_drawdown: f64,
    #[serde(rename = "median_sharpe_ratio", default)]
    pub sharpe_ratio: f64,
    #[serde(rename = "median_sortino_ratio", default)]
    pub sortino_ratio: f64,
    #[serde(rename = "median_calmar_ratio", default)]
    pub calmar_ratio: f64,
    #[serde(rename = "median_expectancy", default)]
    pub expectancy: f64,
    #[serde(rename = "median_profit_factor", default)]
    pub profit_factor: f64,
    #[serde(rename = "median_cagr", default)]
    pub cagr: f64,
    #[serde(rename = "median_rejected_signals", default)]
    pub rejected_signals: f64,
}

impl MetricSet {
    /// Build a set by evaluating `f` for every metric.
    pub fn from_fn(mut f: impl FnMut(Metric) -> f64) -> Self {
        let mut set = Self::default();
        for metric in Metric::ALL {
            set.set(metric, f(metric));
        }
        set
    }

    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalTrades => self.total_trades,
            Metric::WinningTrades => self.winning_trades,
            Metric::LosingTrades => self.losing_trades,
            Metric::WinRate => self.win_rate,
            Metric::TotalProfitPct => self.total_profit_pct,
            Metric::AvgProfit => self.avg_profit,
            Metric::MaxDrawdown => self.max_drawdown,
            Metric::SharpeRatio => self.sharpe_ratio,
            Metric::SortinoRatio => self.sortino_ratio,
            Metric::CalmarRatio => self.calmar_ratio,
            Metric::Expectancy => self.expectancy,
            Metric::ProfitFactor => self.profit_factor,
            Metric::Cagr => self.cagr,
            Metric::RejectedSignals => self.rejected_signals,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::TotalTrades => &mut self.total_trades,
            Metric::WinningTrades => &mut self.winning_trades,
            Metric::LosingTrades => &mut self.losing_trades,
            Metric::WinRate => &mut self.win_rate,
            Metric::TotalProfitPct => &mut self.total_profit_pct,
            Metric::AvgProfit => &mut self.avg_profit,
            Metric::MaxDrawdown => &mut self.max_drawdown,
            Metric::SharpeRatio => &mut self.sharpe_ratio,
            Metric::SortinoRatio => &mut self.sortino_ratio,
            Metric::CalmarRatio => &mut self.calmar_ratio,
            Metric::Expectancy => &mut self.expectancy,
            Metric::ProfitFactor => &mut self.profit_factor,
            Metric::Cagr => &mut self.cagr,
            Metric::RejectedSignals => &mut self.rejected_signals,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_name(metric.name()), Some(metric));
        }
    }

    #[test]
    fn prefixed_and_aliased_names_resolve() {
        assert_eq!(
            Metric::from_name("median_total_profit_pct"),
            Some(Metric::TotalProfitPct)
        );
        assert_eq!(Metric::from_name("median_buys"), Some(Metric::TotalTrades));
        assert_eq!(Metric::from_name("avg_sharpe"), Some(Metric::SharpeRatio));
        assert_eq!(Metric::from_name("ROI"), Some(Metric::TotalProfitPct));
        assert_eq!(Metric::from_name("ninja_score"), None);
    }

    #[test]
    fn from_fn_sets_every_slot() {
        let set = MetricSet::from_fn(|m| m as usize as f64 + 1.0);
        for metric in Metric::ALL {
            assert_eq!(set.get(metric), metric as usize as f64 + 1.0);
        }
    }

    #[test]
    fn serializes_with_median_prefix() {
        let set = MetricSet {
            total_profit_pct: 2.5,
            ..MetricSet::default()
        };
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json["median_total_profit_pct"], 2.5);
        assert!(json.get("total_profit_pct").is_none());
    }
}
