//! Backend-agnostic domain types: runs, identities, metrics, scores, ratings.

pub mod identity;
pub mod metric;
pub mod rating;
pub mod run;
pub mod score;
pub mod source;
pub mod stats;

pub use identity::{StrategyIdentity, Timerange};
pub use metric::{Metric, MetricSet};
pub use rating::{AggregatedRating, StallReason};
pub use run::RunMetrics;
pub use score::{MetricWeight, Score, ScoreCategory, ScoreWeights};
pub use source::StrategySource;
