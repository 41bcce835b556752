//! Infrastructure configuration modules.

pub mod database;
pub mod ingest;
pub mod logging;
pub mod paths;
pub mod settings;

pub use database::{DatabaseConfig, DATABASE_URL_ENV};
pub use ingest::IngestConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use paths::PathsConfig;
pub use settings::Config;
