//! Rating store construction.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::fallback::FallbackRatingStore;
use crate::adapter::outbound::file::FileRatingStore;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteRatingStore;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::RatingStore;

const SQLITE_SCHEME: &str = "sqlite://";

/// Build the rating store once for the process.
///
/// The file store is always present. The SQLite store is added when a
/// database URL is configured and the database can be opened and migrated
/// within the connect timeout; otherwise the failure is logged and the
/// process runs on files alone.
#[must_use]
pub fn build_rating_store(config: &Config) -> Arc<dyn RatingStore> {
    let file = FileRatingStore::new(&config.paths.ratings_dir);

    let primary = config
        .database
        .url
        .as_deref()
        .and_then(|url| match open_sqlite(url, config) {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(url = %url, error = %e, "Database unavailable, using file store");
                None
            }
        });

    let store = FallbackRatingStore::new(primary, file);
    info!(
        backend = store.backend(),
        ratings_dir = %config.paths.ratings_dir.display(),
        "Rating store ready"
    );
    Arc::new(store)
}

fn open_sqlite(url: &str, config: &Config) -> Result<SqliteRatingStore> {
    let path = sqlite_path(url)?;
    let pool = create_pool(path, config.database.connect_timeout())?;
    run_migrations(&pool)?;
    Ok(SqliteRatingStore::new(pool))
}

/// Strip an optional `sqlite://` prefix; any other scheme is unsupported.
fn sqlite_path(url: &str) -> Result<&str> {
    if let Some(path) = url.strip_prefix(SQLITE_SCHEME) {
        return Ok(path);
    }
    if let Some((scheme, _)) = url.split_once("://") {
        return Err(Error::Connection(format!(
            "unsupported database scheme '{scheme}'"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_path_strips_scheme() {
        assert_eq!(sqlite_path("sqlite://a/b.db").unwrap(), "a/b.db");
        assert_eq!(sqlite_path("b.db").unwrap(), "b.db");
        assert!(matches!(
            sqlite_path("postgres://host/db"),
            Err(Error::Connection(_))
        ));
    }

    #[test]
    fn unsupported_scheme_falls_back_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.ratings_dir = dir.path().to_path_buf();
        config.database.url = Some("postgres://localhost/ratings".into());

        let store = build_rating_store(&config);
        assert!(store.list().unwrap().is_empty());
    }
}
