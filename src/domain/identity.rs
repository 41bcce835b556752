//! Strategy identity and backtest period types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The key that groups runs for aggregation.
///
/// Two runs of the same strategy over different periods or timeframes are
/// different identities; they share `strategy_name` for display grouping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrategyIdentity {
    pub strategy_name: String,
    pub timeframe: String,
    /// Raw period string, empty when the archive did not say.
    pub timerange: String,
}

impl StrategyIdentity {
    #[must_use]
    pub fn new(
        strategy_name: impl Into<String>,
        timeframe: impl Into<String>,
        timerange: impl Into<String>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            timeframe: timeframe.into(),
            timerange: timerange.into(),
        }
    }

    /// Flattened `strategy_key` used as the storage key.
    #[must_use]
    pub fn key(&self) -> String {
        if self.timerange.is_empty() {
            format!("{}_{}", self.strategy_name, self.timeframe)
        } else {
            format!("{}_{}_{}", self.strategy_name, self.timeframe, self.timerange)
        }
    }
}

impl fmt::Display for StrategyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A `YYYYMMDD-YYYYMMDD` backtest period.
///
/// The start is inclusive; the end is the date the engine stopped at, so
/// [`Timerange::days`] is a plain date difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timerange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timerange {
    const DATE_FORMAT: &'static str = "%Y%m%d";

    /// Parse a closed `YYYYMMDD-YYYYMMDD` period. Open-ended ranges are rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 17 {
            return None;
        }
        let (start, end) = raw.split_once('-')?;
        let start = NaiveDate::parse_from_str(start, Self::DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end, Self::DATE_FORMAT).ok()?;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Human-readable `YYYY-MM-DD - YYYY-MM-DD` form.
    #[must_use]
    pub fn display_range(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Timerange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(Self::DATE_FORMAT),
            self.end.format(Self::DATE_FORMAT)
        )
    }
}
