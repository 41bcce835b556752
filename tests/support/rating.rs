//! Rating builders.

use chrono::{DateTime, TimeZone, Utc};
use stratrank::domain::{AggregatedRating, MetricSet, ScoreCategory, StallReason};

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub struct RatingBuilder {
    rating: AggregatedRating,
}

impl RatingBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            rating: AggregatedRating {
                strategy_name: name.into(),
                strategy_key: format!("{name}_5m_20240101-20240201"),
                exchange: "gateio".into(),
                stake_currency: "USDT".into(),
                timeframe: "5m".into(),
                timerange: "20240101-20240201".into(),
                days_tested: Some(31),
                total_backtests: 3,
                medians: MetricSet {
                    total_trades: 50.0,
                    total_profit_pct: 5.0,
                    ..MetricSet::default()
                },
                backtest_win_percentage: 100.0,
                ninja_score: 0.0,
                score_category: ScoreCategory::Satisfactory,
                has_lookahead_bias: false,
                lookahead_issues: Vec::new(),
                has_tight_trailing_stop: false,
                leverage: 1.0,
                strategy_hash: None,
                is_stalled: false,
                stall_reason: None,
                is_active: true,
                updated_at: at(1_700_000_000),
            },
        }
    }

    pub fn score(mut self, score: f64) -> Self {
        self.rating.ninja_score = score;
        self.rating.score_category = ScoreCategory::from_score(score);
        self
    }

    pub fn profit(mut self, profit: f64) -> Self {
        self.rating.medians.total_profit_pct = profit;
        self
    }

    pub fn trades(mut self, trades: f64) -> Self {
        self.rating.medians.total_trades = trades;
        self
    }

    pub fn exchange(mut self, exchange: &str) -> Self {
        self.rating.exchange = exchange.into();
        self
    }

    pub fn timeframe(mut self, timeframe: &str) -> Self {
        self.rating.timeframe = timeframe.into();
        self
    }

    pub fn leverage(mut self, leverage: f64) -> Self {
        self.rating.leverage = leverage;
        self
    }

    pub fn backtests(mut self, total: u32) -> Self {
        self.rating.total_backtests = total;
        self
    }

    pub fn stalled(mut self, reason: StallReason) -> Self {
        self.rating.is_stalled = true;
        self.rating.stall_reason = Some(reason);
        self.rating.is_active = false;
        self
    }

    pub fn biased(mut self, issue: &str) -> Self {
        self.rating.has_lookahead_bias = true;
        self.rating.lookahead_issues.push(issue.into());
        self
    }

    pub fn updated(mut self, secs: i64) -> Self {
        self.rating.updated_at = at(secs);
        self
    }

    pub fn build(self) -> AggregatedRating {
        self.rating
    }
}

pub fn rating(name: &str) -> RatingBuilder {
    RatingBuilder::new(name)
}
