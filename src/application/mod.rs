//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement ingestion, rating and ranking.

pub mod aggregate;
pub mod classifier;
pub mod ingest;
pub mod query;
pub mod rating;
pub mod scoring;
pub mod statistics;

pub use aggregate::{aggregate, RunAggregate};
pub use ingest::{BatchReport, IngestService};
pub use query::{RankingPage, RankingQuery, RankingQueryEngine, RatingFilters, SortOrder, Tab};
pub use rating::RatingEngine;
pub use scoring::{Contribution, ScoreCalculator};
pub use statistics::RatingStatistics;
