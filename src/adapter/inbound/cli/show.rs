//! `stratrank show <key>`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ShowArgs;
use crate::adapter::inbound::cli::output;
use crate::application::query::RankingQueryEngine;
use crate::application::scoring::Contribution;
use crate::domain::{AggregatedRating, Metric};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{build_rating_engine, build_rating_store};

#[derive(Tabled)]
struct ContributionRow {
    #[tabled(rename = "Component")]
    name: &'static str,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Normalized")]
    normalized: String,
    #[tabled(rename = "Points")]
    points: String,
}

impl From<&Contribution> for ContributionRow {
    fn from(c: &Contribution) -> Self {
        Self {
            name: c.name,
            weight: format!("{:+}", c.weight),
            value: format!("{:.4}", c.value),
            normalized: format!("{:.1}", c.normalized),
            points: format!("{:.1}", c.points),
        }
    }
}

/// Print one rating and how its score was composed.
pub fn execute(config: &Config, args: &ShowArgs) -> Result<()> {
    let engine = RankingQueryEngine::new(build_rating_store(config));
    let rating = engine
        .get(&args.strategy_key)?
        .ok_or_else(|| Error::NotFound(args.strategy_key.clone()))?;
    let breakdown = build_rating_engine(config)?
        .calculator()
        .breakdown(&rating.medians, rating.backtest_win_percentage);

    if output::is_json() {
        output::json_output(json!({
            "command": "show",
            "rating": rating,
            "breakdown": breakdown,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_rating(&rating);

    output::section("Score breakdown");
    let rows: Vec<ContributionRow> = breakdown.iter().map(ContributionRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn print_rating(rating: &AggregatedRating) {
    output::section(&rating.strategy_key);
    output::field("Strategy", &rating.strategy_name);
    output::field(
        "Market",
        format!("{} / {}", rating.exchange, rating.stake_currency),
    );
    output::field("Timeframe", &rating.timeframe);
    output::field("Period", rating.timerange_display());
    if let Some(days) = rating.days_tested {
        output::field("Days tested", days);
    }
    output::field("Backtests", rating.total_backtests);
    output::field(
        "Score",
        format!(
            "{} ({})",
            output::signed(rating.ninja_score, format!("{:.1}", rating.ninja_score)),
            rating.score_category
        ),
    );
    output::field(
        "Backtest win %",
        format!("{:.1}", rating.backtest_win_percentage),
    );
    output::field("Leverage", rating.leverage);
    output::field("Active", rating.is_active);
    if let Some(reason) = rating.stall_reason {
        output::field("Stalled", output::negative(reason));
    }
    if rating.has_lookahead_bias {
        output::field(
            "Lookahead",
            output::negative(rating.lookahead_issues.join(", ")),
        );
    }
    if rating.has_tight_trailing_stop {
        output::field("Trailing stop", "tight");
    }
    if let Some(hash) = &rating.strategy_hash {
        output::field("Source hash", output::muted(hash));
    }
    output::field("Updated", rating.updated_at.to_rfc3339());

    output::section("Medians");
    for metric in Metric::ALL {
        output::field(metric.name(), format!("{:.4}", rating.median(metric)));
    }
}
