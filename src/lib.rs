//! Stratrank - backtest result aggregation and strategy ranking.
//!
//! Reads the result archives a backtesting engine writes (one ZIP per run),
//! collapses every run of a strategy into one median-based rating, flags
//! strategies that look biased or stalled, scores them, and serves a
//! filterable leaderboard.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Runs, identities, metrics, scores and ratings
//! - [`port`] - Traits for archive reading, the strategy catalog and rating storage
//! - [`application`] - Aggregation, classification, scoring, ingestion and ranking
//! - [`adapter`] - ZIP reader, directory catalog, SQLite and JSON file stores, CLI
//! - [`infrastructure`] - Configuration and component factories
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use stratrank::infrastructure::config::settings::Config;
//! use stratrank::infrastructure::factory::{build_ingest_service, build_rating_store};
//!
//! # async fn run() -> stratrank::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let store = build_rating_store(&config);
//! let report = build_ingest_service(&config, store)?.run().await?;
//! println!("rated {} identities", report.identities_rated);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
