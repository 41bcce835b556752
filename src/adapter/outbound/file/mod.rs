//! JSON flat-file persistence.

pub mod store;

pub use store::{FileRatingStore, RankingsIndex, INDEX_FILE};
