//! Persistence port for aggregated ratings.

use crate::domain::AggregatedRating;
use crate::error::Result;

/// Storage operations for aggregated ratings.
///
/// Implementations key records by `(strategy_key, exchange, stake_currency)`
/// and always replace a record wholesale; there is no partial update.
pub trait RatingStore: Send + Sync {
    /// Insert or fully replace one rating.
    fn upsert(&self, rating: &AggregatedRating) -> Result<()>;

    /// Insert or fully replace every rating of a batch as one unit.
    ///
    /// Readers observe either the state before the batch or after it.
    fn upsert_batch(&self, ratings: &[AggregatedRating]) -> Result<()>;

    /// Fetch the rating stored under `strategy_key`.
    fn get(&self, strategy_key: &str) -> Result<Option<AggregatedRating>>;

    /// Every stored rating, in no particular order.
    fn list(&self) -> Result<Vec<AggregatedRating>>;
}
