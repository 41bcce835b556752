//! Backtest result archives.
//!
//! [`ZipArchiveReader`] implements [`ArchiveReader`](crate::port::ArchiveReader)
//! over the ZIP files the backtesting engine writes, one per run.

mod reader;
mod schema;

pub use reader::{parse_document, ZipArchiveReader, DEFAULT_TIMEFRAME, TIGHT_TRAILING_STOP_POSITIVE};
