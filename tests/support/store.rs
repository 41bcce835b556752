//! Temporary rating stores for integration tests.

use std::time::Duration;

use stratrank::adapter::outbound::file::FileRatingStore;
use stratrank::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use stratrank::adapter::outbound::sqlite::SqliteRatingStore;
use tempfile::TempDir;

/// A SQLite store backed by a file in its own temp directory.
pub fn temp_sqlite() -> (TempDir, SqliteRatingStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("ratings.db");
    let pool = create_pool(path.to_str().expect("utf-8 path"), Duration::from_secs(2))
        .expect("create sqlite pool");
    run_migrations(&pool).expect("run migrations");
    (dir, SqliteRatingStore::new(pool))
}

/// A file store in its own temp directory.
pub fn temp_files() -> (TempDir, FileRatingStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileRatingStore::new(dir.path().join("ratings"));
    (dir, store)
}
