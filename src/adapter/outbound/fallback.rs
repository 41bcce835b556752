//! Composite rating store: SQLite when available, flat files always.
//!
//! The file store is written first on every batch so it always holds the
//! latest snapshot. SQLite errors are logged and absorbed here; only file
//! store errors reach the caller.
//!
//! SQLite can miss a batch, either because it was unreachable when the batch
//! ran or because its write failed. Such a database is marked stale: reads
//! go to the files until a later write has copied the file snapshot back
//! into SQLite. Opening the store also performs that copy when the file
//! snapshot is newer than the database.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::adapter::outbound::file::FileRatingStore;
use crate::adapter::outbound::sqlite::SqliteRatingStore;
use crate::domain::AggregatedRating;
use crate::error::Result;
use crate::port::outbound::store::RatingStore;

/// Rating store that prefers SQLite and falls back to JSON files.
pub struct FallbackRatingStore {
    primary: Option<SqliteRatingStore>,
    file: FileRatingStore,
    /// Set while SQLite lacks writes the file store has.
    stale: AtomicBool,
}

impl FallbackRatingStore {
    /// Wrap both stores, bringing SQLite up to date with the file snapshot
    /// when the snapshot is newer.
    #[must_use]
    pub fn new(primary: Option<SqliteRatingStore>, file: FileRatingStore) -> Self {
        let store = Self {
            primary,
            file,
            stale: AtomicBool::new(false),
        };
        if let Some(primary) = &store.primary {
            match (store.file.list(), primary.list()) {
                (Ok(snapshot), Ok(rows)) => {
                    if latest_update(&snapshot) > latest_update(&rows) {
                        store.resync(primary);
                    }
                }
                (_, Err(e)) => {
                    warn!(error = %e, "Database read failed, serving files");
                    store.stale.store(true, Ordering::Release);
                }
                (Err(e), Ok(_)) => {
                    warn!(error = %e, "File snapshot unreadable, keeping database as is");
                }
            }
        }
        store
    }

    /// File-only store, used when no database is configured or reachable.
    #[must_use]
    pub fn file_only(file: FileRatingStore) -> Self {
        Self::new(None, file)
    }

    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    #[must_use]
    pub fn backend(&self) -> &'static str {
        if self.primary.is_some() {
            "sqlite"
        } else {
            "file"
        }
    }

    /// True while reads are served from files because SQLite is behind.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// SQLite when it is present and current.
    fn readable_primary(&self) -> Option<&SqliteRatingStore> {
        self.primary.as_ref().filter(|_| !self.is_stale())
    }

    /// Copy the whole file snapshot into SQLite.
    fn resync(&self, primary: &SqliteRatingStore) {
        let result = self.file.list().and_then(|snapshot| {
            primary.upsert_batch(&snapshot)?;
            Ok(snapshot.len())
        });
        match result {
            Ok(count) => {
                info!(count, "Database brought up to date from file snapshot");
                self.stale.store(false, Ordering::Release);
            }
            Err(e) => {
                warn!(error = %e, "Database resync failed, serving files");
                self.stale.store(true, Ordering::Release);
            }
        }
    }

    fn write_primary(&self, write: impl FnOnce(&SqliteRatingStore) -> Result<()>) {
        let Some(primary) = &self.primary else {
            return;
        };
        if self.is_stale() {
            self.resync(primary);
            return;
        }
        if let Err(e) = write(primary) {
            warn!(error = %e, "Database write failed, keeping file copy only");
            self.stale.store(true, Ordering::Release);
        }
    }
}

impl RatingStore for FallbackRatingStore {
    fn upsert(&self, rating: &AggregatedRating) -> Result<()> {
        self.file.upsert(rating)?;
        self.write_primary(|primary| primary.upsert(rating));
        Ok(())
    }

    fn upsert_batch(&self, ratings: &[AggregatedRating]) -> Result<()> {
        self.file.upsert_batch(ratings)?;
        self.write_primary(|primary| primary.upsert_batch(ratings));
        Ok(())
    }

    fn get(&self, strategy_key: &str) -> Result<Option<AggregatedRating>> {
        if let Some(primary) = self.readable_primary() {
            match primary.get(strategy_key) {
                Ok(found) => return Ok(found),
                Err(e) => {
                    warn!(key = %strategy_key, error = %e, "Database read failed, falling back to files");
                }
            }
        }
        self.file.get(strategy_key)
    }

    fn list(&self) -> Result<Vec<AggregatedRating>> {
        if let Some(primary) = self.readable_primary() {
            match primary.list() {
                Ok(ratings) => return Ok(ratings),
                Err(e) => {
                    warn!(error = %e, "Database read failed, falling back to files");
                }
            }
        }
        self.file.list()
    }
}

fn latest_update(ratings: &[AggregatedRating]) -> Option<DateTime<Utc>> {
    ratings.iter().map(|r| r.updated_at).max()
}
