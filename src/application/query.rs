//! Ranking query engine: filter, sort and paginate stored ratings.
//!
//! Queries run in memory over [`RatingStore::list`]. Ratings are first put
//! in a canonical order (by storage key) so that every backend yields the
//! same page for the same query, whatever order it listed records in.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{AggregatedRating, Metric};
use crate::error::Result;
use crate::port::outbound::store::RatingStore;

/// Default page size.
pub const DEFAULT_LIMIT: usize = 100;
/// Default `min_profit` filter, in percent.
pub const DEFAULT_MIN_PROFIT: f64 = -100.0;

/// A named base view applied before the user filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Main,
    /// Most recently updated first.
    Latest,
    /// Only stalled or never-backtested ratings; ignores `exclude_stalled`.
    Failed,
}

impl Tab {
    /// Resolve a tab by name. Unknown names are the main view.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "latest" => Self::Latest,
            "failed" => Self::Failed,
            _ => Self::Main,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Latest => "latest",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for Tab {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` (any case) is ascending, everything else descending.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl FromStr for SortOrder {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// A resolved sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Score,
    Metric(Metric),
    BacktestWinPercentage,
    TotalBacktests,
    Leverage,
    UpdatedAt,
    StrategyName,
}

impl SortKey {
    /// Resolve a requested key, tolerating `median_`/`avg_` prefixes and
    /// metric aliases.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Self> {
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "ninja_score" | "score" => Self::Score,
            "backtest_win_percentage" | "win_percentage" => Self::BacktestWinPercentage,
            "total_backtests" | "backtests" => Self::TotalBacktests,
            "leverage" => Self::Leverage,
            "updated_at" => Self::UpdatedAt,
            "strategy_name" | "name" => Self::StrategyName,
            other => return Metric::from_name(other).map(Self::Metric),
        };
        Some(key)
    }

    fn compare(self, a: &AggregatedRating, b: &AggregatedRating) -> Ordering {
        match self {
            Self::Score => a.ninja_score.total_cmp(&b.ninja_score),
            Self::Metric(metric) => a.median(metric).total_cmp(&b.median(metric)),
            Self::BacktestWinPercentage => a
                .backtest_win_percentage
                .total_cmp(&b.backtest_win_percentage),
            Self::TotalBacktests => a.total_backtests.cmp(&b.total_backtests),
            Self::Leverage => a.leverage.total_cmp(&b.leverage),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::StrategyName => a.strategy_name.cmp(&b.strategy_name),
        }
    }
}

/// AND-combined filters. Unset options do not filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingFilters {
    /// Minimum median trade count.
    pub min_trades: Option<f64>,
    /// Minimum median total profit, in percent.
    pub min_profit: Option<f64>,
    pub max_leverage: Option<f64>,
    pub exchange: Option<String>,
    pub stake_currency: Option<String>,
    pub timeframe: Option<String>,
    pub exclude_stalled: bool,
    pub exclude_biased: bool,
    /// Drop ratings with a negative median total profit.
    pub hide_negative: bool,
}

impl Default for RatingFilters {
    fn default() -> Self {
        Self {
            min_trades: None,
            min_profit: Some(DEFAULT_MIN_PROFIT),
            max_leverage: None,
            exchange: None,
            stake_currency: None,
            timeframe: None,
            exclude_stalled: true,
            exclude_biased: true,
            hide_negative: false,
        }
    }
}

impl RatingFilters {
    /// No filtering at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            min_profit: None,
            exclude_stalled: false,
            exclude_biased: false,
            ..Self::default()
        }
    }

    fn accepts(&self, rating: &AggregatedRating, tab: Tab) -> bool {
        let matches_text = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(actual))
        };

        if !matches_text(&self.exchange, &rating.exchange)
            || !matches_text(&self.stake_currency, &rating.stake_currency)
            || !matches_text(&self.timeframe, &rating.timeframe)
        {
            return false;
        }

        let profit = rating.median(Metric::TotalProfitPct);
        if self.hide_negative && profit < 0.0 {
            return false;
        }
        if self
            .min_trades
            .is_some_and(|min| rating.median(Metric::TotalTrades) < min)
        {
            return false;
        }
        if self.min_profit.is_some_and(|min| profit < min) {
            return false;
        }
        if self.max_leverage.is_some_and(|max| rating.leverage > max) {
            return false;
        }
        if tab != Tab::Failed && self.exclude_stalled && rating.is_stalled {
            return false;
        }
        if self.exclude_biased && rating.has_lookahead_bias {
            return false;
        }
        true
    }
}

/// One ranking request.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingQuery {
    pub filters: RatingFilters,
    /// Requested sort key. `None` sorts by score, except on the latest tab
    /// where the recency order is kept.
    pub sort_by: Option<String>,
    pub order: SortOrder,
    pub tab: Tab,
    pub limit: usize,
    pub offset: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            filters: RatingFilters::default(),
            sort_by: None,
            order: SortOrder::Desc,
            tab: Tab::Main,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// A page of ranked ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingPage {
    pub items: Vec<AggregatedRating>,
    /// Number of ratings that matched the tab and filters.
    pub total: usize,
    /// Same as `total`; kept for consumers that read either name.
    pub filtered: usize,
}

/// Rank an in-memory set of ratings.
#[must_use]
pub fn rank(mut ratings: Vec<AggregatedRating>, query: &RankingQuery) -> RankingPage {
    ratings.sort_by(|a, b| {
        (&a.strategy_key, &a.exchange, &a.stake_currency).cmp(&(
            &b.strategy_key,
            &b.exchange,
            &b.stake_currency,
        ))
    });

    match query.tab {
        Tab::Latest => ratings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        Tab::Failed => ratings.retain(AggregatedRating::is_failed),
        Tab::Main => {}
    }

    ratings.retain(|rating| query.filters.accepts(rating, query.tab));

    let sort_key = match query.sort_by.as_deref() {
        Some(name) => Some(SortKey::resolve(name).unwrap_or_else(|| {
            warn!(sort_by = name, "Unknown sort key, sorting by score");
            SortKey::Score
        })),
        None if query.tab == Tab::Latest => None,
        None => Some(SortKey::Score),
    };

    if let Some(key) = sort_key {
        match query.order {
            SortOrder::Asc => ratings.sort_by(|a, b| key.compare(a, b)),
            SortOrder::Desc => ratings.sort_by(|a, b| key.compare(b, a)),
        }
    }

    let matched = ratings.len();
    let items: Vec<_> = ratings
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    debug!(
        tab = %query.tab,
        matched,
        returned = items.len(),
        "Ranking query"
    );

    RankingPage {
        items,
        total: matched,
        filtered: matched,
    }
}

/// Serves ranking queries from a rating store.
pub struct RankingQueryEngine {
    store: Arc<dyn RatingStore>,
}

impl RankingQueryEngine {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self { store }
    }

    pub fn query(&self, query: &RankingQuery) -> Result<RankingPage> {
        Ok(rank(self.store.list()?, query))
    }

    pub fn get(&self, strategy_key: &str) -> Result<Option<AggregatedRating>> {
        self.store.get(strategy_key)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{MetricSet, ScoreCategory, StallReason};

    fn rating(key: &str, score: f64, profit: f64) -> AggregatedRating {
        AggregatedRating {
            strategy_name: key.to_string(),
            strategy_key: format!("{key}_5m"),
            exchange: "gateio".into(),
            stake_currency: "USDT".into(),
            timeframe: "5m".into(),
            timerange: String::new(),
            days_tested: None,
            total_backtests: 3,
            medians: MetricSet {
                total_profit_pct: profit,
                total_trades: 50.0,
                ..MetricSet::default()
            },
            backtest_win_percentage: 50.0,
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
            updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn stalled(mut r: AggregatedRating) -> AggregatedRating {
        r.is_stalled = true;
        r.is_active = false;
        r.stall_reason = Some(StallReason::Negative);
        r
    }

    fn names(page: &RankingPage) -> Vec<&str> {
        page.items.iter().map(|r| r.strategy_name.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_by_score_and_hides_stalled() {
        let ratings = vec![
            rating("a", 100.0, 1.0),
            rating("b", 300.0, 2.0),
            stalled(rating("c", 900.0, -3.0)),
        ];
        let page = rank(ratings, &RankingQuery::default());
        assert_eq!(names(&page), ["b", "a"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.filtered, 2);
    }

    #[test]
    fn failed_tab_overrides_exclude_stalled() {
        let mut never_run = rating("d", 10.0, 0.0);
        never_run.total_backtests = 0;
        let ratings = vec![
            rating("a", 100.0, 1.0),
            stalled(rating("c", 900.0, -3.0)),
            never_run,
        ];
        let query = RankingQuery {
            tab: Tab::Failed,
            ..RankingQuery::default()
        };
        assert!(query.filters.exclude_stalled);
        let page = rank(ratings, &query);
        assert_eq!(names(&page), ["c", "d"]);
    }

    #[test]
    fn latest_tab_keeps_recency_order_without_sort_key() {
        let mut old = rating("old", 900.0, 1.0);
        old.updated_at = Utc.timestamp_opt(1_000, 0).unwrap();
        let mut new = rating("new", 1.0, 1.0);
        new.updated_at = Utc.timestamp_opt(2_000, 0).unwrap();

        let query = RankingQuery {
            tab: Tab::Latest,
            ..RankingQuery::default()
        };
        assert_eq!(names(&rank(vec![old.clone(), new.clone()], &query)), ["new", "old"]);

        let by_score = RankingQuery {
            sort_by: Some("ninja_score".into()),
            ..query
        };
        assert_eq!(names(&rank(vec![old, new], &by_score)), ["old", "new"]);
    }

    #[test]
    fn unknown_tab_is_main() {
        assert_eq!(Tab::from_name("dca"), Tab::Main);
        assert_eq!(Tab::from_name("FAILED"), Tab::Failed);
        assert_eq!("latest".parse::<Tab>(), Ok(Tab::Latest));
    }

    #[test]
    fn sort_key_aliases_resolve() {
        assert_eq!(
            SortKey::resolve("median_total_profit_pct"),
            Some(SortKey::Metric(Metric::TotalProfitPct))
        );
        assert_eq!(
            SortKey::resolve("avg_tot_profit_pct"),
            Some(SortKey::Metric(Metric::TotalProfitPct))
        );
        assert_eq!(SortKey::resolve("ninja_score"), Some(SortKey::Score));
        assert_eq!(SortKey::resolve("bogus"), None);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_score() {
        let query = RankingQuery {
            sort_by: Some("bogus".into()),
            ..RankingQuery::default()
        };
        let page = rank(vec![rating("a", 1.0, 0.0), rating("b", 2.0, 0.0)], &query);
        assert_eq!(names(&page), ["b", "a"]);
    }

    #[test]
    fn ties_break_on_storage_key() {
        let query = RankingQuery {
            sort_by: Some("median_win_rate".into()),
            order: SortOrder::Asc,
            ..RankingQuery::default()
        };
        let page = rank(
            vec![rating("z", 1.0, 0.0), rating("m", 2.0, 0.0), rating("a", 3.0, 0.0)],
            &query,
        );
        assert_eq!(names(&page), ["a", "m", "z"]);
    }

    #[test]
    fn filters_combine() {
        let mut levered = rating("lev", 500.0, 4.0);
        levered.leverage = 5.0;
        let mut binance = rating("bin", 400.0, 4.0);
        binance.exchange = "binance".into();
        let mut biased = rating("bias", 450.0, 4.0);
        biased.has_lookahead_bias = true;
        let ratings = vec![
            levered,
            binance,
            biased,
            rating("neg", 300.0, -2.0),
            rating("ok", 200.0, 3.0),
        ];

        let query = RankingQuery {
            filters: RatingFilters {
                max_leverage: Some(3.0),
                exchange: Some("GATEIO".into()),
                hide_negative: true,
                ..RatingFilters::default()
            },
            ..RankingQuery::default()
        };
        assert_eq!(names(&rank(ratings.clone(), &query)), ["ok"]);

        let page = rank(
            ratings,
            &RankingQuery {
                filters: RatingFilters::none(),
                ..RankingQuery::default()
            },
        );
        assert_eq!(page.total, 5);
    }

    #[test]
    fn min_filters_use_medians() {
        let mut thin = rating("thin", 100.0, 5.0);
        thin.medians.total_trades = 3.0;
        let query = RankingQuery {
            filters: RatingFilters {
                min_trades: Some(10.0),
                min_profit: Some(4.0),
                ..RatingFilters::default()
            },
            ..RankingQuery::default()
        };
        let page = rank(vec![thin, rating("low", 90.0, 1.0), rating("good", 80.0, 6.0)], &query);
        assert_eq!(names(&page), ["good"]);
    }

    #[test]
    fn pagination_slices_but_counts_all_matches() {
        let ratings: Vec<_> = (0..7)
            .map(|i| rating(&format!("s{i}"), f64::from(i), 1.0))
            .collect();
        let query = RankingQuery {
            limit: 2,
            offset: 3,
            ..RankingQuery::default()
        };
        let page = rank(ratings, &query);
        assert_eq!(names(&page), ["s3", "s2"]);
        assert_eq!(page.total, 7);
    }
}
