//! Relational backend settings.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_ENV: &str = "STRATRANK_DATABASE_URL";

/// SQLite backend configuration. Without a URL only the file store is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, optionally prefixed with `sqlite://`.
    pub url: Option<String>,
    /// How long to wait for the first connection before falling back.
    pub connect_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout_ms: 5_000,
        }
    }
}
