//! Composite score types and the static weight table.
//!
//! A rating's composite score is a weighted sum over its median metrics.
//! Each weighted metric is first normalized into `0..=100` against a fixed
//! range, then multiplied by its weight:
//!
//! - positive weights (higher is better) contribute `normalized × weight`
//! - negative weights (lower is better) contribute `(100 − normalized) × |weight|`
//!
//! The backtest win percentage is already a percentage and contributes
//! `value × weight` directly.
//!
//! # Examples
//!
//! ```
//! use stratrank::domain::score::{ScoreCategory, ScoreWeights};
//! use stratrank::domain::metric::Metric;
//!
//! let weights = ScoreWeights::default();
//! let drawdown = weights.weight_for(Metric::MaxDrawdown).unwrap();
//! assert_eq!(drawdown.contribution(0.0), 2500.0);
//! assert_eq!(ScoreCategory::from_score(250.0), ScoreCategory::Good);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metric::Metric;

/// Weight and normalization range for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWeight {
    pub metric: Metric,
    /// Signed weight; negative means lower values are better.
    pub weight: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricWeight {
    #[must_use]
    pub const fn new(metric: Metric, weight: f64, min: f64, max: f64) -> Self {
        Self {
            metric,
            weight,
            min,
            max,
        }
    }

    /// Linear clamp of `value` into `0..=100` against this metric's range.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max == self.min || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0) * 100.0
    }

    /// This metric's signed contribution to the composite score.
    #[must_use]
    pub fn contribution(&self, value: f64) -> f64 {
        let normalized = self.normalize(value);
        if self.weight < 0.0 {
            (100.0 - normalized) * self.weight.abs()
        } else {
            normalized * self.weight
        }
    }
}

const STANDARD_METRIC_WEIGHTS: [MetricWeight; 12] = [
    MetricWeight::new(Metric::TotalTrades, 9.0, 0.0, 1000.0),
    MetricWeight::new(Metric::AvgProfit, 26.0, -5.0, 5.0),
    MetricWeight::new(Metric::TotalProfitPct, 26.0, -50.0, 50.0),
    MetricWeight::new(Metric::WinRate, 24.0, 0.0, 100.0),
    MetricWeight::new(Metric::MaxDrawdown, -25.0, 0.0, 50.0),
    MetricWeight::new(Metric::SharpeRatio, 7.0, -2.0, 5.0),
    MetricWeight::new(Metric::SortinoRatio, 7.0, -2.0, 5.0),
    MetricWeight::new(Metric::CalmarRatio, 7.0, -2.0, 5.0),
    MetricWeight::new(Metric::Expectancy, 8.0, -1.0, 1.0),
    MetricWeight::new(Metric::ProfitFactor, 9.0, 0.0, 5.0),
    MetricWeight::new(Metric::Cagr, 10.0, -50.0, 100.0),
    MetricWeight::new(Metric::RejectedSignals, -25.0, 0.0, 100.0),
];

/// The process-wide weight table.
///
/// Read-only; [`ScoreWeights::STANDARD`] is the only table the crate ships.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    metrics: &'static [MetricWeight],
    /// Weight applied to the raw backtest win percentage.
    pub backtest_win_percentage: f64,
}

impl ScoreWeights {
    pub const STANDARD: ScoreWeights = ScoreWeights {
        metrics: &STANDARD_METRIC_WEIGHTS,
        backtest_win_percentage: 10.0,
    };

    #[must_use]
    pub fn metrics(&self) -> &'static [MetricWeight] {
        self.metrics
    }

    #[must_use]
    pub fn weight_for(&self, metric: Metric) -> Option<&'static MetricWeight> {
        self.metrics.iter().find(|w| w.metric == metric)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Coarse bucket for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Poor,
    Satisfactory,
    Good,
    Excellent,
}

impl ScoreCategory {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 500.0 {
            Self::Excellent
        } else if score >= 200.0 {
            Self::Good
        } else if score >= 0.0 {
            Self::Satisfactory
        } else {
            Self::Poor
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Excellent" => Ok(Self::Excellent),
            "Good" => Ok(Self::Good),
            "Satisfactory" => Ok(Self::Satisfactory),
            "Poor" => Ok(Self::Poor),
            other => Err(format!("unknown score category '{other}'")),
        }
    }
}

/// A composite score with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub category: ScoreCategory,
}

impl Score {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            category: ScoreCategory::from_score(value),
        }
    }
}
