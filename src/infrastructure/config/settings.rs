//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; `STRATRANK_DATABASE_URL`
//! overrides the database URL so deployments can point at a database
//! without editing the file.
//!
//! # Example
//!
//! ```no_run
//! use stratrank::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::Path;

use serde::Deserialize;

use super::database::{DatabaseConfig, DATABASE_URL_ENV};
use super::ingest::IngestConfig;
use super::logging::LoggingConfig;
use super::paths::PathsConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_with_env(content: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from a TOML file, or use the defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for anything but a missing file.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::parse_toml(""),
            Err(e) => Err(ConfigError::ReadFile(e).into()),
        }
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env(DATABASE_URL_ENV) {
            self.database.url = Some(url);
        }
        if self
            .database
            .url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.database.url = None;
        }
    }

    /// Check that all required values are present and in range.
    fn validate(&self) -> Result<()> {
        let paths = [
            ("results_dir", &self.paths.results_dir),
            ("strategies_dir", &self.paths.strategies_dir),
            ("ratings_dir", &self.paths.ratings_dir),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        if self.ingest.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.ingest.exchange.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "exchange" }.into());
        }
        if self.ingest.stake_currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "stake_currency",
            }
            .into());
        }
        if self.ingest.default_timeframe.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "default_timeframe",
            }
            .into());
        }

        if self.database.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::LogFormat;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse_with_env("", no_env).unwrap();
        assert_eq!(config.paths.results_dir, PathBuf::from("user_data/backtest_results"));
        assert_eq!(config.ingest.exchange, "gateio");
        assert_eq!(config.ingest.stake_currency, "USDT");
        assert_eq!(config.ingest.default_timeframe, "5m");
        assert!(config.ingest.workers > 0);
        assert!(config.database.url.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn full_document_parses() {
        let toml = r#"
[paths]
results_dir = "r"
strategies_dir = "s"
ratings_dir = "o"

[database]
url = "sqlite://ratings.db"
connect_timeout_ms = 250

[ingest]
workers = 3
exchange = "binance"
stake_currency = "BTC"
default_timeframe = "1h"

[logging]
level = "debug"
format = "json"
"#;
        let config = Config::parse_with_env(toml, no_env).unwrap();
        assert_eq!(config.paths.ratings_dir, PathBuf::from("o"));
        assert_eq!(config.database.url.as_deref(), Some("sqlite://ratings.db"));
        assert_eq!(config.database.connect_timeout().as_millis(), 250);
        assert_eq!(config.ingest.workers, 3);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn env_overrides_database_url() {
        let config = Config::parse_with_env("[database]\nurl = \"a.db\"", |key| {
            (key == DATABASE_URL_ENV).then(|| "b.db".to_string())
        })
        .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("b.db"));
    }

    #[test]
    fn blank_database_url_means_none() {
        let config = Config::parse_with_env("[database]\nurl = \"  \"", no_env).unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn rejects_zero_workers() {
        let result = Config::parse_with_env("[ingest]\nworkers = 0", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "workers", .. }))
        ));
    }

    #[test]
    fn rejects_empty_exchange() {
        let result = Config::parse_with_env("[ingest]\nexchange = \"\"", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "exchange" }))
        ));
    }

    #[test]
    fn rejects_empty_path() {
        let result = Config::parse_with_env("[paths]\nresults_dir = \"\"", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "results_dir" }))
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = Config::parse_with_env("[ingest\nworkers = ", no_env);
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ingest.exchange, "gateio");
    }
}
