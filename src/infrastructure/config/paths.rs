//! Filesystem locations.

use std::path::PathBuf;

use serde::Deserialize;

/// Directories read and written by the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for `*.zip` result archives.
    pub results_dir: PathBuf,
    /// Directory scanned for `*.py` strategy sources.
    pub strategies_dir: PathBuf,
    /// Directory of the JSON rating files.
    pub ratings_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("user_data/backtest_results"),
            strategies_dir: PathBuf::from("user_data/strategies"),
            ratings_dir: PathBuf::from("user_data/ratings"),
        }
    }
}
