//! The aggregated, scored rating for one strategy identity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::Timerange;
use super::metric::{Metric, MetricSet};
use super::score::ScoreCategory;

/// Why a strategy was classified as stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StallReason {
    #[serde(rename = "no_trades")]
    NoTrades,
    #[serde(rename = "biased")]
    Biased,
    #[serde(rename = "90_percent_negative")]
    NinetyPercentNegative,
    #[serde(rename = "negative")]
    Negative,
}

impl StallReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTrades => "no_trades",
            Self::Biased => "biased",
            Self::NinetyPercentNegative => "90_percent_negative",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for StallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StallReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_trades" => Ok(Self::NoTrades),
            "biased" => Ok(Self::Biased),
            "90_percent_negative" => Ok(Self::NinetyPercentNegative),
            "negative" => Ok(Self::Negative),
            other => Err(format!("unknown stall reason '{other}'")),
        }
    }
}

/// One rating per strategy identity.
///
/// Derived entirely from the runs known for the identity; every batch
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRating {
    /// Base strategy name shared by all identities of the strategy.
    pub strategy_name: String,
    /// Flattened identity, see [`StrategyIdentity::key`](super::identity::StrategyIdentity::key).
    pub strategy_key: String,
    pub exchange: String,
    pub stake_currency: String,
    pub timeframe: String,
    pub timerange: String,
    #[serde(default)]
    pub days_tested: Option<i64>,
    pub total_backtests: u32,
    #[serde(flatten)]
    pub medians: MetricSet,
    pub backtest_win_percentage: f64,
    pub ninja_score: f64,
    pub score_category: ScoreCategory,
    pub has_lookahead_bias: bool,
    #[serde(default)]
    pub lookahead_issues: Vec<String>,
    #[serde(default)]
    pub has_tight_trailing_stop: bool,
    pub leverage: f64,
    #[serde(default)]
    pub strategy_hash: Option<String>,
    pub is_stalled: bool,
    #[serde(default)]
    pub stall_reason: Option<StallReason>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl AggregatedRating {
    #[must_use]
    pub fn median(&self, metric: Metric) -> f64 {
        self.medians.get(metric)
    }

    /// Stalled or never backtested; the population of the `failed` tab.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.is_stalled || self.total_backtests == 0
    }

    #[must_use]
    pub fn timerange_display(&self) -> String {
        Timerange::parse(&self.timerange)
            .map(|range| range.display_range())
            .unwrap_or_else(|| self.timerange.clone())
    }
}
