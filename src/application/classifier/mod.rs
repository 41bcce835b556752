//! Advisory classification: lookahead-bias scan and stall heuristics.
//!
//! Neither check blocks ingestion or scoring; both surface as rating fields.

pub mod lookahead;
pub mod stall;

pub use lookahead::{LookaheadReport, LookaheadRule, LookaheadScanner, PatternRule};
pub use stall::classify_stall;
