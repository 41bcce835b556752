//! Ingestion settings.

use serde::Deserialize;

use crate::adapter::outbound::archive::DEFAULT_TIMEFRAME;

/// Batch ingestion configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Archives read concurrently. Defaults to the number of CPUs.
    pub workers: usize,
    /// Exchange recorded on every rating.
    pub exchange: String,
    /// Stake currency recorded on every rating.
    pub stake_currency: String,
    /// Timeframe assumed when an archive does not state one.
    pub default_timeframe: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            exchange: "gateio".into(),
            stake_currency: "USDT".into(),
            default_timeframe: DEFAULT_TIMEFRAME.into(),
        }
    }
}
