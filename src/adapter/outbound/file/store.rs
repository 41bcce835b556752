//! Flat-file rating store.
//!
//! Layout under the ratings directory:
//!
//! - `rankings.json`: every rating, sorted by score descending, with a
//!   timestamp and count. This index is what reads are served from.
//! - `<strategy_key>_<exchange>_<stake>_rating.json`: one record per rating.
//!
//! Every file is written to a temp file and renamed into place, and writers
//! are serialized, so a reader sees either the previous index or the new one.

use std::cmp::Ordering;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::AggregatedRating;
use crate::error::Result;
use crate::port::outbound::store::RatingStore;

/// Name of the combined index file.
pub const INDEX_FILE: &str = "rankings.json";

const RECORD_SUFFIX: &str = "_rating.json";

/// Contents of `rankings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsIndex {
    pub updated_at: DateTime<Utc>,
    pub total_strategies: usize,
    pub rankings: Vec<AggregatedRating>,
}

/// JSON-file-backed rating store.
pub struct FileRatingStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRatingStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Path of the per-rating record file.
    #[must_use]
    pub fn record_path(&self, rating: &AggregatedRating) -> PathBuf {
        let stem = format!(
            "{}_{}_{}",
            rating.strategy_key, rating.exchange, rating.stake_currency
        );
        self.dir.join(format!("{}{RECORD_SUFFIX}", sanitize(&stem)))
    }

    /// Load the index. A missing, unreadable or corrupt index is empty.
    fn load(&self) -> Vec<AggregatedRating> {
        let path = self.index_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read rankings index, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice::<RankingsIndex>(&bytes) {
            Ok(index) => index.rankings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt rankings index, treating as empty");
                Vec::new()
            }
        }
    }

    /// Merge `ratings` into the index and write records and index.
    fn write(&self, ratings: &[AggregatedRating]) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut merged = self.load();
        for rating in ratings {
            match merged.iter_mut().find(|r| same_record(r, rating)) {
                Some(slot) => *slot = rating.clone(),
                None => merged.push(rating.clone()),
            }
        }
        merged.sort_by(by_score_desc);

        fs::create_dir_all(&self.dir)?;
        for rating in ratings {
            write_atomic(&self.record_path(rating), &serde_json::to_vec_pretty(rating)?)?;
        }

        let index = RankingsIndex {
            updated_at: Utc::now(),
            total_strategies: merged.len(),
            rankings: merged,
        };
        write_atomic(&self.index_path(), &serde_json::to_vec_pretty(&index)?)?;
        debug!(
            dir = %self.dir.display(),
            written = ratings.len(),
            total = index.total_strategies,
            "Wrote rating files"
        );
        Ok(())
    }
}

impl RatingStore for FileRatingStore {
    fn upsert(&self, rating: &AggregatedRating) -> Result<()> {
        self.write(std::slice::from_ref(rating))
    }

    fn upsert_batch(&self, ratings: &[AggregatedRating]) -> Result<()> {
        self.write(ratings)
    }

    /// The record under `strategy_key`; with several exchanges or stake
    /// currencies, the first in `(exchange, stake_currency)` order.
    fn get(&self, strategy_key: &str) -> Result<Option<AggregatedRating>> {
        Ok(self
            .load()
            .into_iter()
            .filter(|r| r.strategy_key == strategy_key)
            .min_by(|a, b| {
                (&a.exchange, &a.stake_currency).cmp(&(&b.exchange, &b.stake_currency))
            }))
    }

    fn list(&self) -> Result<Vec<AggregatedRating>> {
        Ok(self.load())
    }
}

fn same_record(a: &AggregatedRating, b: &AggregatedRating) -> bool {
    a.strategy_key == b.strategy_key
        && a.exchange == b.exchange
        && a.stake_currency == b.stake_currency
}

fn by_score_desc(a: &AggregatedRating, b: &AggregatedRating) -> Ordering {
    b.ninja_score.total_cmp(&a.ninja_score).then_with(|| {
        (&a.strategy_key, &a.exchange, &a.stake_currency).cmp(&(
            &b.strategy_key,
            &b.exchange,
            &b.stake_currency,
        ))
    })
}

/// Replace anything outside `[A-Za-z0-9._-]` so a key is a safe file name.
fn sanitize(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write-to-temp-then-rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let cleanup_and_err = |e| {
        let _ = fs::remove_file(&temp_path);
        e
    };

    file.write_all(bytes).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    fs::rename(&temp_path, path).map_err(cleanup_and_err)?;
    Ok(())
}
