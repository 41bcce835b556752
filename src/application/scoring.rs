//! Composite score calculation.

use serde::Serialize;

use crate::domain::{MetricSet, Score, ScoreWeights};

/// One line of a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub name: &'static str,
    pub weight: f64,
    /// Aggregated input value.
    pub value: f64,
    /// Value normalized into `0..=100`; the raw value for the win percentage.
    pub normalized: f64,
    pub points: f64,
}

/// Maps aggregated metrics to a weighted composite score.
///
/// A pure function of its inputs: identical medians and win percentage
/// always produce the identical score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator {
    weights: ScoreWeights,
}

impl ScoreCalculator {
    #[must_use]
    pub const fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    #[must_use]
    pub fn score(&self, medians: &MetricSet, backtest_win_percentage: f64) -> Score {
        let total = self
            .breakdown(medians, backtest_win_percentage)
            .iter()
            .map(|c| c.points)
            .fold(0.0, |acc, p| acc + p);
        Score::new(total)
    }

    /// Per-metric contributions in weight-table order, win percentage last.
    #[must_use]
    pub fn breakdown(&self, medians: &MetricSet, backtest_win_percentage: f64) -> Vec<Contribution> {
        let mut lines: Vec<Contribution> = self
            .weights
            .metrics()
            .iter()
            .map(|w| {
                let value = medians.get(w.metric);
                Contribution {
                    name: w.metric.name(),
                    weight: w.weight,
                    value,
                    normalized: w.normalize(value),
                    points: w.contribution(value),
                }
            })
            .collect();

        let bwp_weight = self.weights.backtest_win_percentage;
        lines.push(Contribution {
            name: "backtest_win_percentage",
            weight: bwp_weight,
            value: backtest_win_percentage,
            normalized: backtest_win_percentage,
            points: backtest_win_percentage * bwp_weight,
        });
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreCategory;

    #[test]
    fn all_zero_medians_score() {
        // Zero sits mid-range for the signed metrics and at the floor for the
        // rest; drawdown and rejected signals earn their full inverse weight.
        let calc = ScoreCalculator::default();
        let score = calc.score(&MetricSet::default(), 0.0);

        let expected = 26.0 * 50.0 // avg_profit
            + 26.0 * 50.0 // total_profit_pct
            + 25.0 * 100.0 // max_drawdown
            + 3.0 * 7.0 * (2.0 / 7.0 * 100.0) // sharpe, sortino, calmar
            + 8.0 * 50.0 // expectancy
            + 10.0 * (50.0 / 150.0 * 100.0) // cagr
            + 25.0 * 100.0; // rejected_signals
        assert!((score.value - expected).abs() < 1e-9);
        assert_eq!(score.category, ScoreCategory::Excellent);
    }

    #[test]
    fn identical_inputs_identical_scores() {
        let medians = MetricSet {
            total_trades: 120.0,
            total_profit_pct: 12.5,
            avg_profit: 0.4,
            win_rate: 61.0,
            max_drawdown: 8.0,
            sharpe_ratio: 1.3,
            ..MetricSet::default()
        };
        let calc = ScoreCalculator::default();
        assert_eq!(calc.score(&medians, 75.0), calc.score(&medians, 75.0));
    }

    #[test]
    fn breakdown_sums_to_score() {
        let medians = MetricSet {
            total_trades: 300.0,
            max_drawdown: 70.0,
            cagr: -80.0,
            ..MetricSet::default()
        };
        let calc = ScoreCalculator::default();
        let lines = calc.breakdown(&medians, 40.0);
        let sum: f64 = lines.iter().map(|c| c.points).sum();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines.last().map(|c| c.points), Some(400.0));
        assert_eq!(calc.score(&medians, 40.0).value, sum);

        let drawdown = lines.iter().find(|c| c.name == "max_drawdown").unwrap();
        assert_eq!(drawdown.normalized, 100.0);
        assert_eq!(drawdown.points, 0.0);
    }

    #[test]
    fn win_percentage_adds_ten_points_per_percent() {
        let calc = ScoreCalculator::default();
        let base = calc.score(&MetricSet::default(), 0.0).value;
        let full = calc.score(&MetricSet::default(), 100.0).value;
        assert!((full - base - 1000.0).abs() < 1e-9);
    }
}
