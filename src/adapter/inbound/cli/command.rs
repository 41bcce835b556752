//! Command-line interface definitions.
//!
//! Defines the `stratrank` CLI using `clap`: ingest result archives, list
//! rankings, show one rating, and print catalog statistics.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::query::{
    RankingQuery, RatingFilters, SortOrder, Tab, DEFAULT_LIMIT, DEFAULT_MIN_PROFIT,
};

/// Backtest result aggregation and strategy ranking
#[derive(Parser, Debug)]
#[command(name = "stratrank")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read every result archive and rewrite the ratings
    Ingest(IngestArgs),

    /// List ranked strategies
    Rankings(RankingsArgs),

    /// Show one rating with its score breakdown
    Show(ShowArgs),

    /// Print catalog-wide statistics
    Stats,
}

/// Arguments for `stratrank ingest`.
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Results directory (overrides `paths.results_dir`)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Concurrent archive readers (overrides `ingest.workers`)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Arguments for `stratrank rankings`.
#[derive(Args, Debug)]
pub struct RankingsArgs {
    /// Tab: main, latest or failed
    #[arg(long, default_value = "main")]
    pub tab: String,

    /// Sort key: a metric name (with or without `median_`), an alias,
    /// ninja_score, backtest_win_percentage, total_backtests, leverage,
    /// updated_at or strategy_name
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort order: asc or desc
    #[arg(long, default_value = "desc")]
    pub order: String,

    /// Maximum rows to return
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Minimum median trade count
    #[arg(long)]
    pub min_trades: Option<f64>,

    /// Minimum median total profit (%)
    #[arg(long, default_value_t = DEFAULT_MIN_PROFIT, allow_negative_numbers = true)]
    pub min_profit: f64,

    /// Maximum leverage
    #[arg(long)]
    pub max_leverage: Option<f64>,

    /// Exchange (case-insensitive)
    #[arg(long)]
    pub exchange: Option<String>,

    /// Stake currency (case-insensitive)
    #[arg(long)]
    pub stake_currency: Option<String>,

    /// Timeframe (case-insensitive)
    #[arg(long)]
    pub timeframe: Option<String>,

    /// Keep stalled strategies
    #[arg(long)]
    pub include_stalled: bool,

    /// Keep strategies flagged for lookahead bias
    #[arg(long)]
    pub include_biased: bool,

    /// Drop strategies with a negative median profit
    #[arg(long)]
    pub hide_negative: bool,
}

impl RankingsArgs {
    /// Translate the flags into a ranking query.
    #[must_use]
    pub fn to_query(&self) -> RankingQuery {
        RankingQuery {
            filters: RatingFilters {
                min_trades: self.min_trades,
                min_profit: Some(self.min_profit),
                max_leverage: self.max_leverage,
                exchange: self.exchange.clone(),
                stake_currency: self.stake_currency.clone(),
                timeframe: self.timeframe.clone(),
                exclude_stalled: !self.include_stalled,
                exclude_biased: !self.include_biased,
                hide_negative: self.hide_negative,
            },
            sort_by: self.sort_by.clone(),
            order: SortOrder::from_name(&self.order),
            tab: Tab::from_name(&self.tab),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Arguments for `stratrank show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Strategy key, e.g. `EWO_A_5m_20240101-20240201`
    pub strategy_key: String,
}
