//! Wire shapes of the backtest result document.
//!
//! Only the fields the reader uses are modelled; everything else in the
//! document is ignored. All numbers are read as `f64` because the engine
//! writes counts as integers in some versions and floats in others.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level result document.
///
/// Newer engines nest the per-strategy block under `strategy`; older ones
/// put `{"<Name>": {"results": ..., "config": ...}}` at the top level, which
/// lands in `rest`.
#[derive(Debug, Default, Deserialize)]
pub struct ResultDocument {
    #[serde(default)]
    pub strategy: Option<BTreeMap<String, StrategyBlock>>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_json::Value>,
}

/// Per-strategy result block. Also the shape of a legacy `results` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyBlock {
    pub total_trades: Option<f64>,
    pub wins: Option<f64>,
    pub losses: Option<f64>,
    /// Win ratio in `0..=1`.
    pub winrate: Option<f64>,
    pub profit_total_pct: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub sharpe: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub sortino: Option<f64>,
    pub calmar_ratio: Option<f64>,
    pub calmar: Option<f64>,
    pub expectancy: Option<f64>,
    pub profit_factor: Option<f64>,
    pub cagr: Option<f64>,
    pub rejected_signals: Option<f64>,
    pub leverage: Option<f64>,
    pub trailing_stop_positive: Option<f64>,
    pub trailing_stop_positive_offset: Option<f64>,
    pub timeframe: Option<String>,
    pub timerange: Option<String>,
    pub backtest_start: Option<String>,
    pub backtest_end: Option<String>,
    pub backtest_days: Option<f64>,
    pub trades: Option<Vec<TradeRecord>>,
    pub results_per_pair: Option<PairResults>,
}

impl StrategyBlock {
    #[must_use]
    pub fn trades(&self) -> &[TradeRecord] {
        self.trades.as_deref().unwrap_or_default()
    }

    /// `sharpe_ratio`, or the engine's short `sharpe` spelling.
    #[must_use]
    pub fn sharpe(&self) -> f64 {
        self.sharpe_ratio.or(self.sharpe).unwrap_or(0.0)
    }

    #[must_use]
    pub fn sortino(&self) -> f64 {
        self.sortino_ratio.or(self.sortino).unwrap_or(0.0)
    }

    #[must_use]
    pub fn calmar(&self) -> f64 {
        self.calmar_ratio.or(self.calmar).unwrap_or(0.0)
    }

    /// True when the block reports any trades or profit at all.
    #[must_use]
    pub fn has_activity(&self) -> bool {
        self.total_trades.unwrap_or(0.0) > 0.0
            || self.profit_total_pct.unwrap_or(0.0) != 0.0
            || !self.trades().is_empty()
            || self
                .results_per_pair
                .as_ref()
                .is_some_and(|pairs| pairs.rows().any(|row| row.trades.unwrap_or(0.0) > 0.0))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeRecord {
    pub profit_ratio: Option<f64>,
}

/// Per-pair summary, written as a map keyed by pair or as a list of rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PairResults {
    Map(BTreeMap<String, PairRow>),
    List(Vec<PairRow>),
}

impl PairResults {
    /// Every per-pair row, excluding the engine's `TOTAL` summary row.
    pub fn rows(&self) -> Box<dyn Iterator<Item = &PairRow> + '_> {
        match self {
            Self::Map(map) => Box::new(
                map.iter()
                    .filter(|(pair, _)| pair.as_str() != "TOTAL")
                    .map(|(_, row)| row),
            ),
            Self::List(rows) => {
                Box::new(rows.iter().filter(|row| row.key.as_deref() != Some("TOTAL")))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairRow {
    pub key: Option<String>,
    pub trades: Option<f64>,
    pub profit_total_pct: Option<f64>,
}

/// Run configuration: the legacy per-strategy `config` block and the
/// archive's `*config*.json` entry share this shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    pub timeframe: Option<String>,
    pub timerange: Option<String>,
    pub leverage: Option<f64>,
    pub trailing_stop_positive: Option<f64>,
    pub trailing_stop_positive_offset: Option<f64>,
}

/// A legacy top-level `{"results": ..., "config": ...}` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyEntry {
    pub results: Option<StrategyBlock>,
    #[serde(default)]
    pub config: RunConfig,
}
