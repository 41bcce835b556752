//! `stratrank stats`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::statistics::RatingStatistics;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{build_catalog, build_rating_store};

/// Print summary counters over all stored ratings.
pub fn execute(config: &Config) -> Result<()> {
    let store = build_rating_store(config);
    let catalog = build_catalog(config)?;
    let ratings = store.list()?;
    let stats = RatingStatistics::from_ratings(&ratings, catalog.len());

    if output::is_json() {
        output::json_output(json!({
            "command": "stats",
            "statistics": stats,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Statistics");
    output::field("Strategies", stats.total_strategies);
    output::field("Ratings", stats.total_ratings);
    output::field("Backtests", stats.total_backtests);
    output::field(
        "Failed",
        format!("{} ({:.1}%)", stats.failed_count, stats.failed_testing_pct),
    );
    output::field(
        "Stalled",
        format!("{} ({:.1}%)", stats.stalled_count, stats.stalled_pct),
    );
    output::field(
        "Lookahead bias",
        format!("{} ({:.1}%)", stats.lookahead_count, stats.lookahead_pct),
    );

    match &stats.top_strategy {
        Some(top) => {
            output::section("Top strategy");
            output::field("Strategy", output::highlight(&top.strategy_key));
            output::field("Score", format!("{:.1}", top.ninja_score));
            output::field(
                "Median profit %",
                output::signed(
                    top.median_total_profit_pct,
                    format!("{:.2}", top.median_total_profit_pct),
                ),
            );
        }
        None => output::warning("No ratings stored yet"),
    }
    Ok(())
}
