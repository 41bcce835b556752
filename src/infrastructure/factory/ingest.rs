//! Catalog, rating engine and ingest service construction.

use std::sync::Arc;

use crate::adapter::outbound::archive::ZipArchiveReader;
use crate::adapter::outbound::catalog::DirectoryCatalog;
use crate::application::ingest::IngestService;
use crate::application::rating::RatingEngine;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::catalog::StrategyCatalog;
use crate::port::outbound::store::RatingStore;

/// Scan the configured strategies directory.
pub fn build_catalog(config: &Config) -> Result<Arc<dyn StrategyCatalog>> {
    Ok(Arc::new(DirectoryCatalog::scan(&config.paths.strategies_dir)?))
}

/// Rating engine with the standard lookahead rules and score weights.
pub fn build_rating_engine(config: &Config) -> Result<RatingEngine> {
    RatingEngine::standard(&config.ingest.exchange, &config.ingest.stake_currency)
}

/// Wire the ingest service from configuration and a shared store.
pub fn build_ingest_service(config: &Config, store: Arc<dyn RatingStore>) -> Result<IngestService> {
    let reader = Arc::new(ZipArchiveReader::new(&config.ingest.default_timeframe));
    Ok(IngestService::new(
        &config.paths.results_dir,
        config.ingest.workers,
        reader,
        build_catalog(config)?,
        build_rating_engine(config)?,
        store,
    ))
}
