//! Rating engine: aggregate, classify and score one identity.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::application::aggregate::aggregate;
use crate::application::classifier::{classify_stall, LookaheadScanner};
use crate::application::scoring::ScoreCalculator;
use crate::domain::{AggregatedRating, RunMetrics, StrategyIdentity, StrategySource};
use crate::error::Result;

/// Produces one [`AggregatedRating`] per identity.
///
/// Deterministic given its inputs; the caller supplies `now` so a whole
/// batch shares one timestamp.
#[derive(Debug)]
pub struct RatingEngine {
    scanner: LookaheadScanner,
    calculator: ScoreCalculator,
    exchange: String,
    stake_currency: String,
}

impl RatingEngine {
    pub fn new(
        scanner: LookaheadScanner,
        calculator: ScoreCalculator,
        exchange: impl Into<String>,
        stake_currency: impl Into<String>,
    ) -> Self {
        Self {
            scanner,
            calculator,
            exchange: exchange.into(),
            stake_currency: stake_currency.into(),
        }
    }

    /// Engine with the built-in lookahead rules and the standard weights.
    pub fn standard(exchange: impl Into<String>, stake_currency: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            LookaheadScanner::standard()?,
            ScoreCalculator::default(),
            exchange,
            stake_currency,
        ))
    }

    #[must_use]
    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    /// Rate `identity` from every run currently known for it.
    ///
    /// `is_active` reflects the stall verdict only; catalog membership is
    /// applied by the caller.
    #[must_use]
    pub fn rate(
        &self,
        identity: &StrategyIdentity,
        runs: &[RunMetrics],
        source: Option<&StrategySource>,
        now: DateTime<Utc>,
    ) -> AggregatedRating {
        let aggregate = aggregate(identity.clone(), runs);
        let lookahead = self.scanner.scan(source.map(|s| s.text.as_str()));
        let stall_reason = classify_stall(runs, lookahead.has_bias());
        let score = self
            .calculator
            .score(&aggregate.medians, aggregate.backtest_win_percentage);

        debug!(
            key = %identity,
            runs = runs.len(),
            score = score.value,
            stall_reason = ?stall_reason,
            "Rated strategy"
        );

        AggregatedRating {
            strategy_name: identity.strategy_name.clone(),
            strategy_key: identity.key(),
            exchange: self.exchange.clone(),
            stake_currency: self.stake_currency.clone(),
            timeframe: identity.timeframe.clone(),
            timerange: identity.timerange.clone(),
            days_tested: aggregate.days_tested,
            total_backtests: aggregate.total_backtests,
            medians: aggregate.medians,
            backtest_win_percentage: aggregate.backtest_win_percentage,
            ninja_score: score.value,
            score_category: score.category,
            has_lookahead_bias: lookahead.has_bias(),
            lookahead_issues: lookahead.issues,
            has_tight_trailing_stop: aggregate.has_tight_trailing_stop,
            leverage: aggregate.leverage,
            strategy_hash: source.map(|s| s.hash.clone()),
            is_stalled: stall_reason.is_some(),
            stall_reason,
            is_active: stall_reason.is_none(),
            updated_at: now,
        }
    }
}
