//! SQLite rating store implementation.
//!
//! Provides persistent storage for aggregated ratings using SQLite and
//! Diesel ORM. One row per `(strategy_key, exchange, stake_currency)`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{NewRatingRow, RatingRow};
use crate::adapter::outbound::sqlite::database::schema::strategy_ratings;
use crate::domain::{AggregatedRating, MetricSet, ScoreCategory, StallReason};
use crate::error::{Error, Result};
use crate::port::outbound::store::RatingStore;

/// SQLite-backed rating store.
pub struct SqliteRatingStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteRatingStore {
    /// Create a new SQLite rating store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(rating: &AggregatedRating) -> Result<NewRatingRow> {
        let m = &rating.medians;
        Ok(NewRatingRow {
            strategy_name: rating.strategy_name.clone(),
            strategy_key: rating.strategy_key.clone(),
            exchange: rating.exchange.clone(),
            stake_currency: rating.stake_currency.clone(),
            timeframe: rating.timeframe.clone(),
            timerange: rating.timerange.clone(),
            days_tested: rating.days_tested,
            total_backtests: i32::try_from(rating.total_backtests).unwrap_or(i32::MAX),
            median_total_trades: m.total_trades,
            median_winning_trades: m.winning_trades,
            median_losing_trades: m.losing_trades,
            median_win_rate: m.win_rate,
            median_total_profit_pct: m.total_profit_pct,
            median_avg_profit: m.avg_profit,
            median_max_drawdown: m.max_drawdown,
            median_sharpe_ratio: m.sharpe_ratio,
            median_sortino_ratio: m.sortino_ratio,
            median_calmar_ratio: m.calmar_ratio,
            median_expectancy: m.expectancy,
            median_profit_factor: m.profit_factor,
            median_cagr: m.cagr,
            median_rejected_signals: m.rejected_signals,
            backtest_win_percentage: rating.backtest_win_percentage,
            ninja_score: rating.ninja_score,
            score_category: rating.score_category.as_str().to_string(),
            has_lookahead_bias: rating.has_lookahead_bias,
            lookahead_issues: serde_json::to_string(&rating.lookahead_issues)
                .map_err(|e| Error::Parse(e.to_string()))?,
            has_tight_trailing_stop: rating.has_tight_trailing_stop,
            leverage: rating.leverage,
            strategy_hash: rating.strategy_hash.clone(),
            is_stalled: rating.is_stalled,
            stall_reason: rating.stall_reason.map(|r| r.as_str().to_string()),
            is_active: rating.is_active,
            updated_at: rating.updated_at.to_rfc3339(),
        })
    }

    fn from_row(row: RatingRow) -> Result<AggregatedRating> {
        let score_category: ScoreCategory = row.score_category.parse().map_err(Error::Parse)?;
        let stall_reason: Option<StallReason> = row
            .stall_reason
            .as_deref()
            .map(str::parse::<StallReason>)
            .transpose()
            .map_err(Error::Parse)?;
        let lookahead_issues: Vec<String> =
            serde_json::from_str(&row.lookahead_issues).map_err(|e| Error::Parse(e.to_string()))?;
        let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.updated_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(AggregatedRating {
            strategy_name: row.strategy_name,
            strategy_key: row.strategy_key,
            exchange: row.exchange,
            stake_currency: row.stake_currency,
            timeframe: row.timeframe,
            timerange: row.timerange,
            days_tested: row.days_tested,
            total_backtests: u32::try_from(row.total_backtests).unwrap_or(0),
            medians: MetricSet {
                total_trades: row.median_total_trades,
                winning_trades: row.median_winning_trades,
                losing_trades: row.median_losing_trades,
                win_rate: row.median_win_rate,
                total_profit_pct: row.median_total_profit_pct,
                avg_profit: row.median_avg_profit,
                max_drawdown: row.median_max_drawdown,
                sharpe_ratio: row.median_sharpe_ratio,
                sortino_ratio: row.median_sortino_ratio,
                calmar_ratio: row.median_calmar_ratio,
                expectancy: row.median_expectancy,
                profit_factor: row.median_profit_factor,
                cagr: row.median_cagr,
                rejected_signals: row.median_rejected_signals,
            },
            backtest_win_percentage: row.backtest_win_percentage,
            ninja_score: row.ninja_score,
            score_category,
            has_lookahead_bias: row.has_lookahead_bias,
            lookahead_issues,
            has_tight_trailing_stop: row.has_tight_trailing_stop,
            leverage: row.leverage,
            strategy_hash: row.strategy_hash,
            is_stalled: row.is_stalled,
            stall_reason,
            is_active: row.is_active,
            updated_at,
        })
    }

    fn upsert_row(conn: &mut SqliteConnection, row: &NewRatingRow) -> QueryResult<usize> {
        diesel::insert_into(strategy_ratings::table)
            .values(row)
            .on_conflict((
                strategy_ratings::strategy_key,
                strategy_ratings::exchange,
                strategy_ratings::stake_currency,
            ))
            .do_update()
            .set(row)
            .execute(conn)
    }
}

impl RatingStore for SqliteRatingStore {
    fn upsert(&self, rating: &AggregatedRating) -> Result<()> {
        let row = Self::to_row(rating)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::upsert_row(&mut conn, &row).map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn upsert_batch(&self, ratings: &[AggregatedRating]) -> Result<()> {
        let rows = ratings
            .iter()
            .map(Self::to_row)
            .collect::<Result<Vec<_>>>()?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                Self::upsert_row(conn, row)?;
            }
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    fn get(&self, strategy_key: &str) -> Result<Option<AggregatedRating>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<RatingRow> = strategy_ratings::table
            .filter(strategy_ratings::strategy_key.eq(strategy_key))
            .order((
                strategy_ratings::exchange.asc(),
                strategy_ratings::stake_currency.asc(),
            ))
            .select(RatingRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    fn list(&self) -> Result<Vec<AggregatedRating>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<RatingRow> = strategy_ratings::table
            .select(RatingRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
