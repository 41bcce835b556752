//! `stratrank rankings`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::RankingsArgs;
use crate::adapter::inbound::cli::output;
use crate::application::query::RankingQueryEngine;
use crate::domain::{AggregatedRating, Metric};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::build_rating_store;

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "TF")]
    timeframe: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Runs")]
    runs: u32,
    #[tabled(rename = "Trades")]
    trades: String,
    #[tabled(rename = "Profit %")]
    profit: String,
    #[tabled(rename = "Win %")]
    win: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl RankingRow {
    fn new(rank: usize, rating: &AggregatedRating) -> Self {
        Self {
            rank,
            strategy: rating.strategy_name.clone(),
            timeframe: rating.timeframe.clone(),
            period: rating.timerange_display(),
            runs: rating.total_backtests,
            trades: format!("{:.0}", rating.median(Metric::TotalTrades)),
            profit: format!("{:.2}", rating.median(Metric::TotalProfitPct)),
            win: format!("{:.1}", rating.backtest_win_percentage),
            score: format!("{:.1}", rating.ninja_score),
            category: rating.score_category.to_string(),
            flags: flags(rating),
        }
    }
}

fn flags(rating: &AggregatedRating) -> String {
    let mut flags = Vec::new();
    if let Some(reason) = rating.stall_reason {
        flags.push(format!("stalled:{reason}"));
    }
    if rating.has_lookahead_bias {
        flags.push("lookahead".to_string());
    }
    if rating.has_tight_trailing_stop {
        flags.push("tight-tsl".to_string());
    }
    if !rating.is_active {
        flags.push("inactive".to_string());
    }
    flags.join(" ")
}

/// Query the store and print one page of rankings.
pub fn execute(config: &Config, args: &RankingsArgs) -> Result<()> {
    let query = args.to_query();
    let engine = RankingQueryEngine::new(build_rating_store(config));
    let page = engine.query(&query)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "rankings",
            "tab": query.tab,
            "items": page.items,
            "total": page.total,
            "filtered": page.filtered,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Rankings ({})", query.tab));

    if page.items.is_empty() {
        output::warning("No ratings match");
        output::hint(&format!(
            "run {} first, or relax the filters",
            output::highlight("stratrank ingest")
        ));
        return Ok(());
    }

    let rows: Vec<RankingRow> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, rating)| RankingRow::new(query.offset + i + 1, rating))
        .collect();
    output::lines(&Table::new(rows).to_string());
    output::field(
        "Showing",
        format!(
            "{}-{} of {}",
            query.offset + 1,
            query.offset + page.items.len(),
            page.total
        ),
    );
    Ok(())
}
