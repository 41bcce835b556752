//! ZIP result-archive reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;
use zip::ZipArchive;

use super::schema::{LegacyEntry, ResultDocument, RunConfig, StrategyBlock};
use crate::domain::{RunMetrics, Timerange};
use crate::port::outbound::archive::{ArchiveReader, ReadResult, SkipReason};

/// `trailing_stop_positive` at or below this is a tight trailing stop.
pub const TIGHT_TRAILING_STOP_POSITIVE: f64 = 0.0025;

/// Timeframe assumed when neither the document nor the run config says.
pub const DEFAULT_TIMEFRAME: &str = "5m";

/// Reads one backtest result archive.
///
/// The result document is the first `.json` entry whose name does not
/// contain `config`. A `*config*.json` entry, when present, backs up the
/// document's timeframe, timerange and leverage.
#[derive(Debug, Clone)]
pub struct ZipArchiveReader {
    default_timeframe: String,
}

impl ZipArchiveReader {
    pub fn new(default_timeframe: impl Into<String>) -> Self {
        Self {
            default_timeframe: default_timeframe.into(),
        }
    }

    fn read_entries(path: &Path) -> Result<(String, Option<String>), SkipReason> {
        let file = File::open(path).map_err(|e| SkipReason::Open(e.to_string()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| SkipReason::Open(e.to_string()))?;

        let mut document = None;
        let mut config = None;
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| SkipReason::Open(e.to_string()))?;
            let name = entry.name().to_ascii_lowercase();
            if entry.is_dir() || !name.ends_with(".json") {
                continue;
            }

            let is_config = name.contains("config");
            if (is_config && config.is_some()) || (!is_config && document.is_some()) {
                continue;
            }

            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| SkipReason::Malformed(format!("{}: {e}", entry.name())))?;
            if is_config {
                config = Some(text);
            } else {
                document = Some(text);
            }
        }

        let document = document.ok_or(SkipReason::NoDocument)?;
        Ok((document, config))
    }
}

impl Default for ZipArchiveReader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEFRAME)
    }
}

impl ArchiveReader for ZipArchiveReader {
    fn read(&self, path: &Path) -> ReadResult {
        let parsed = Self::read_entries(path).and_then(|(document, config)| {
            parse_document(&document, config.as_deref(), &self.default_timeframe)
        });
        match parsed {
            Ok(run) => ReadResult::Parsed(run),
            Err(reason) => ReadResult::Skipped(reason),
        }
    }
}

/// The result block chosen from a document.
enum ResultLayout {
    Nested {
        name: String,
        block: StrategyBlock,
    },
    Legacy {
        name: String,
        block: StrategyBlock,
        config: RunConfig,
    },
}

impl ResultLayout {
    /// Prefer an active nested block, then an active legacy entry, then an
    /// idle nested block (a real zero-trade run).
    fn resolve(document: ResultDocument) -> Option<Self> {
        let nested = document
            .strategy
            .and_then(|blocks| blocks.into_iter().next())
            .map(|(name, block)| Self::Nested { name, block });

        if nested.as_ref().is_some_and(|layout| layout.block().has_activity()) {
            return nested;
        }

        let legacy = document.rest.into_iter().find_map(|(name, value)| {
            if !value.is_object() {
                return None;
            }
            let LegacyEntry { results, config } =
                serde_json::from_value::<LegacyEntry>(value).ok()?;
            let block = results?;
            block
                .has_activity()
                .then_some(Self::Legacy { name, block, config })
        });

        legacy.or(nested)
    }

    fn block(&self) -> &StrategyBlock {
        match self {
            Self::Nested { block, .. } | Self::Legacy { block, .. } => block,
        }
    }
}

/// Parse a result document (and optional run config) into one run.
pub fn parse_document(
    document: &str,
    config: Option<&str>,
    default_timeframe: &str,
) -> Result<RunMetrics, SkipReason> {
    let document: ResultDocument =
        serde_json::from_str(document).map_err(|e| SkipReason::Malformed(e.to_string()))?;

    let config_entry: RunConfig = match config.map(serde_json::from_str::<RunConfig>) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            debug!(error = %e, "Ignoring unreadable run config");
            RunConfig::default()
        }
        None => RunConfig::default(),
    };

    let run = match ResultLayout::resolve(document).ok_or(SkipReason::NoResultBlock)? {
        ResultLayout::Nested { name, block } => {
            build_run(name, &block, None, &config_entry, default_timeframe)
        }
        ResultLayout::Legacy {
            name,
            block,
            config,
        } => build_run(name, &block, Some(&config), &config_entry, default_timeframe),
    };
    Ok(run)
}

fn build_run(
    strategy_name: String,
    block: &StrategyBlock,
    legacy_config: Option<&RunConfig>,
    config_entry: &RunConfig,
    default_timeframe: &str,
) -> RunMetrics {
    let trades = block.trades();
    let pair_rows = || block.results_per_pair.iter().flat_map(|pairs| pairs.rows());

    let mut total_trades = count(block.total_trades);
    if total_trades == 0 {
        total_trades = if trades.is_empty() {
            pair_rows().map(|row| count(row.trades)).sum()
        } else {
            trades.len() as u64
        };
    }

    let mut profit = block.profit_total_pct.unwrap_or(0.0);
    if profit == 0.0 && !trades.is_empty() {
        profit = trades
            .iter()
            .map(|t| t.profit_ratio.unwrap_or(0.0) * 100.0)
            .fold(0.0, |acc, p| acc + p);
    }
    if profit == 0.0 && trades.is_empty() {
        // `Sum for f64` yields -0.0 on an empty iterator.
        profit = pair_rows()
            .map(|row| row.profit_total_pct.unwrap_or(0.0))
            .fold(0.0, |acc, p| acc + p);
    }
    let profit = profit + 0.0;

    let mut wins = count(block.wins);
    let mut losses = count(block.losses);
    if wins == 0 && losses == 0 && !trades.is_empty() {
        wins = trades
            .iter()
            .filter(|t| t.profit_ratio.unwrap_or(0.0) > 0.0)
            .count() as u64;
        losses = trades.len() as u64 - wins;
    }

    let win_rate = if total_trades > 0 && wins > 0 {
        wins as f64 * 100.0 / total_trades as f64
    } else {
        block.winrate.unwrap_or(0.0) * 100.0
    };

    let configs = || legacy_config.into_iter().chain(std::iter::once(config_entry));

    let timeframe = non_empty(block.timeframe.as_deref())
        .or_else(|| configs().find_map(|c| non_empty(c.timeframe.as_deref())))
        .unwrap_or(default_timeframe)
        .to_string();

    let span = match (
        block.backtest_start.as_deref().and_then(parse_day),
        block.backtest_end.as_deref().and_then(parse_day),
    ) {
        (Some(start), Some(end)) => Some(Timerange { start, end }),
        _ => None,
    };

    let timerange = non_empty(block.timerange.as_deref())
        .map(str::to_string)
        .or_else(|| span.map(|s| s.to_string()))
        .or_else(|| {
            configs()
                .find_map(|c| non_empty(c.timerange.as_deref()))
                .map(str::to_string)
        })
        .unwrap_or_default();

    let days_tested = Timerange::parse(&timerange)
        .or(span)
        .map(|range| range.days())
        .or_else(|| {
            block
                .backtest_days
                .filter(|d| d.is_finite() && *d > 0.0)
                .map(|d| d.round() as i64)
        });

    let leverage = block
        .leverage
        .or_else(|| configs().find_map(|c| c.leverage))
        .filter(|l| l.is_finite() && *l > 0.0)
        .unwrap_or(1.0);

    let trailing_stop_positive = block
        .trailing_stop_positive
        .or_else(|| configs().find_map(|c| c.trailing_stop_positive));

    RunMetrics {
        strategy_name,
        timeframe,
        timerange,
        days_tested,
        total_trades,
        wins,
        losses,
        win_rate,
        total_profit_pct: profit,
        avg_profit_pct: profit / total_trades.max(1) as f64 + 0.0,
        max_drawdown: block.max_drawdown.unwrap_or(0.0).abs(),
        sharpe_ratio: block.sharpe(),
        sortino_ratio: block.sortino(),
        calmar_ratio: block.calmar(),
        expectancy: block.expectancy.unwrap_or(0.0),
        profit_factor: block.profit_factor.unwrap_or(0.0),
        cagr: block.cagr.unwrap_or(0.0),
        rejected_signals: count(block.rejected_signals),
        leverage,
        has_tight_trailing_stop: trailing_stop_positive
            .is_some_and(|positive| positive <= TIGHT_TRAILING_STOP_POSITIVE),
    }
}

fn count(value: Option<f64>) -> u64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or(0, |v| v.round() as u64)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Date part of an engine timestamp such as `2024-01-01 00:00:00`.
fn parse_day(timestamp: &str) -> Option<NaiveDate> {
    let day = timestamp.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
