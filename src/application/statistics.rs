//! Catalog-wide summary counters.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{AggregatedRating, Metric};

/// The best-scoring rating, as shown on the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopStrategy {
    pub strategy_name: String,
    pub strategy_key: String,
    pub ninja_score: f64,
    pub median_total_profit_pct: f64,
}

/// Summary over every stored rating.
///
/// Percentages are relative to `total_strategies` and rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStatistics {
    /// Catalog size, or the number of distinct rated strategies when there
    /// is no catalog.
    pub total_strategies: usize,
    pub total_ratings: usize,
    pub total_backtests: u64,
    pub top_strategy: Option<TopStrategy>,
    pub failed_count: usize,
    pub failed_testing_pct: f64,
    pub lookahead_count: usize,
    pub lookahead_pct: f64,
    pub stalled_count: usize,
    pub stalled_pct: f64,
}

impl RatingStatistics {
    #[must_use]
    pub fn from_ratings(ratings: &[AggregatedRating], catalog_size: usize) -> Self {
        let total_strategies = if catalog_size > 0 {
            catalog_size
        } else {
            ratings
                .iter()
                .map(|r| r.strategy_name.as_str())
                .collect::<BTreeSet<_>>()
                .len()
        };

        let pct = |count: usize| {
            if total_strategies == 0 {
                0.0
            } else {
                (count as f64 / total_strategies as f64 * 1000.0).round() / 10.0
            }
        };

        let failed_count = ratings.iter().filter(|r| r.is_failed()).count();
        let lookahead_count = ratings.iter().filter(|r| r.has_lookahead_bias).count();
        let stalled_count = ratings.iter().filter(|r| r.is_stalled).count();

        let top_strategy = ratings
            .iter()
            .max_by(|a, b| {
                a.ninja_score
                    .total_cmp(&b.ninja_score)
                    .then_with(|| b.strategy_key.cmp(&a.strategy_key))
            })
            .map(|top| TopStrategy {
                strategy_name: top.strategy_name.clone(),
                strategy_key: top.strategy_key.clone(),
                ninja_score: top.ninja_score,
                median_total_profit_pct: top.median(Metric::TotalProfitPct),
            });

        Self {
            total_strategies,
            total_ratings: ratings.len(),
            total_backtests: ratings.iter().map(|r| u64::from(r.total_backtests)).sum(),
            top_strategy,
            failed_count,
            failed_testing_pct: pct(failed_count),
            lookahead_count,
            lookahead_pct: pct(lookahead_count),
            stalled_count,
            stalled_pct: pct(stalled_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{MetricSet, ScoreCategory, StallReason};

    fn rating(name: &str, score: f64) -> AggregatedRating {
        AggregatedRating {
            strategy_name: name.into(),
            strategy_key: format!("{name}_5m"),
            exchange: "gateio".into(),
            stake_currency: "USDT".into(),
            timeframe: "5m".into(),
            timerange: String::new(),
            days_tested: None,
            total_backtests: 2,
            medians: MetricSet::default(),
            backtest_win_percentage: 0.0,
            ninja_score: score,
            score_category: ScoreCategory::from_score(score),
            has_lookahead_bias: false,
            lookahead_issues: Vec::new(),
            has_tight_trailing_stop: false,
            leverage: 1.0,
            strategy_hash: None,
            is_stalled: false,
            stall_reason: None,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn counts_and_percentages() {
        let mut biased = rating("b", 50.0);
        biased.has_lookahead_bias = true;
        biased.is_stalled = true;
        biased.stall_reason = Some(StallReason::Biased);
        let mut empty = rating("c", 10.0);
        empty.total_backtests = 0;

        let stats = RatingStatistics::from_ratings(&[rating("a", 300.0), biased, empty], 3);
        assert_eq!(stats.total_strategies, 3);
        assert_eq!(stats.total_backtests, 4);
        assert_eq!(stats.failed_count, 2);
        assert_eq!(stats.failed_testing_pct, 66.7);
        assert_eq!(stats.lookahead_count, 1);
        assert_eq!(stats.lookahead_pct, 33.3);
        assert_eq!(stats.stalled_count, 1);
        assert_eq!(stats.top_strategy.map(|t| t.strategy_name), Some("a".to_string()));
    }

    #[test]
    fn without_catalog_counts_distinct_names() {
        let mut other_period = rating("a", 1.0);
        other_period.strategy_key = "a_1h".into();
        let stats = RatingStatistics::from_ratings(&[rating("a", 2.0), other_period], 0);
        assert_eq!(stats.total_strategies, 1);
        assert_eq!(stats.total_ratings, 2);
    }

    #[test]
    fn empty_is_all_zero() {
        let stats = RatingStatistics::from_ratings(&[], 0);
        assert_eq!(stats.total_strategies, 0);
        assert_eq!(stats.failed_testing_pct, 0.0);
        assert!(stats.top_strategy.is_none());
    }
}
