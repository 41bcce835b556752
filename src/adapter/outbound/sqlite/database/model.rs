//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::strategy_ratings;

/// Database row for a rating (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = strategy_ratings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RatingRow {
    pub id: Option<i32>,
    pub strategy_name: String,
    pub strategy_key: String,
    pub exchange: String,
    pub stake_currency: String,
    pub timeframe: String,
    pub timerange: String,
    pub days_tested: Option<i64>,
    pub total_backtests: i32,
    pub median_total_trades: f64,
    pub median_winning_trades: f64,
    pub median_losing_trades: f64,
    pub median_win_rate: f64,
    pub median_total_profit_pct: f64,
    pub median_avg_profit: f64,
    pub median_max_drawdown: f64,
    pub median_sharpe_ratio: f64,
    pub median_sortino_ratio: f64,
    pub median_calmar_ratio: f64,
    pub median_expectancy: f64,
    pub median_profit_factor: f64,
    pub median_cagr: f64,
    pub median_rejected_signals: f64,
    pub backtest_win_percentage: f64,
    pub ninja_score: f64,
    pub score_category: String,
    pub has_lookahead_bias: bool,
    pub lookahead_issues: String,
    pub has_tight_trailing_stop: bool,
    pub leverage: f64,
    pub strategy_hash: Option<String>,
    pub is_stalled: bool,
    pub stall_reason: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

/// Database row for a rating (insertable, and the full-replace changeset).
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = strategy_ratings)]
#[diesel(treat_none_as_null = true)]
pub struct NewRatingRow {
    pub strategy_name: String,
    pub strategy_key: String,
    pub exchange: String,
    pub stake_currency: String,
    pub timeframe: String,
    pub timerange: String,
    pub days_tested: Option<i64>,
    pub total_backtests: i32,
    pub median_total_trades: f64,
    pub median_winning_trades: f64,
    pub median_losing_trades: f64,
    pub median_win_rate: f64,
    pub median_total_profit_pct: f64,
    pub median_avg_profit: f64,
    pub median_max_drawdown: f64,
    pub median_sharpe_ratio: f64,
    pub median_sortino_ratio: f64,
    pub median_calmar_ratio: f64,
    pub median_expectancy: f64,
    pub median_profit_factor: f64,
    pub median_cagr: f64,
    pub median_rejected_signals: f64,
    pub backtest_win_percentage: f64,
    pub ninja_score: f64,
    pub score_category: String,
    pub has_lookahead_bias: bool,
    pub lookahead_issues: String,
    pub has_tight_trailing_stop: bool,
    pub leverage: f64,
    pub strategy_hash: Option<String>,
    pub is_stalled: bool,
    pub stall_reason: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}
