//! Batch ingestion: archives in, one full replace of the rating set out.
//!
//! Archives are read concurrently on a bounded pool. Everything after the
//! read (grouping, rating, catalog deactivation) runs in this task once all
//! runs are collected, and the result is written with a single
//! [`RatingStore::upsert_batch`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::rating::RatingEngine;
use crate::domain::{AggregatedRating, RunMetrics, StrategyIdentity};
use crate::error::Result;
use crate::port::{ArchiveReader, RatingStore, ReadResult, SkipReason, StrategyCatalog};

/// Counters for one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub archives: usize,
    pub runs_parsed: usize,
    /// Skipped archives by [`SkipReason::kind`](crate::port::SkipReason::kind).
    pub skipped: BTreeMap<&'static str, usize>,
    pub identities_rated: usize,
    pub stalled: usize,
    /// Ratings marked inactive because their strategy left the catalog.
    pub deactivated: usize,
}

impl BatchReport {
    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// The ingestion use case.
pub struct IngestService {
    results_dir: PathBuf,
    workers: usize,
    reader: Arc<dyn ArchiveReader>,
    catalog: Arc<dyn StrategyCatalog>,
    engine: RatingEngine,
    store: Arc<dyn RatingStore>,
}

impl IngestService {
    pub fn new(
        results_dir: impl Into<PathBuf>,
        workers: usize,
        reader: Arc<dyn ArchiveReader>,
        catalog: Arc<dyn StrategyCatalog>,
        engine: RatingEngine,
        store: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            workers: workers.max(1),
            reader,
            catalog,
            engine,
            store,
        }
    }

    /// Run one batch stamped with the current time.
    pub async fn run(&self) -> Result<BatchReport> {
        self.run_at(Utc::now()).await
    }

    /// Run one batch; every rating written carries `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<BatchReport> {
        let archives = list_archives(&self.results_dir).await?;
        info!(
            dir = %self.results_dir.display(),
            archives = archives.len(),
            workers = self.workers,
            "Ingesting backtest results"
        );

        let mut report = BatchReport {
            archives: archives.len(),
            ..BatchReport::default()
        };
        let runs = self.read_all(archives, &mut report).await;

        let mut ratings: Vec<AggregatedRating> = runs
            .iter()
            .map(|(identity, runs)| {
                let source = self.catalog.source(&identity.strategy_name);
                self.engine.rate(identity, runs, source.as_ref(), now)
            })
            .collect();
        report.identities_rated = ratings.len();
        report.stalled = ratings.iter().filter(|r| r.is_stalled).count();

        report.deactivated = self.deactivate_missing(&mut ratings, now)?;

        self.store.upsert_batch(&ratings)?;

        info!(
            archives = report.archives,
            runs = report.runs_parsed,
            skipped = report.skipped_total(),
            rated = report.identities_rated,
            stalled = report.stalled,
            deactivated = report.deactivated,
            "Ingestion complete"
        );
        Ok(report)
    }

    async fn read_all(
        &self,
        archives: Vec<PathBuf>,
        report: &mut BatchReport,
    ) -> BTreeMap<StrategyIdentity, Vec<RunMetrics>> {
        let results: Vec<(PathBuf, ReadResult)> = stream::iter(archives)
            .map(|path| {
                let reader = Arc::clone(&self.reader);
                async move {
                    let target = path.clone();
                    let result = tokio::task::spawn_blocking(move || reader.read(&target))
                        .await
                        .unwrap_or_else(|e| {
                            ReadResult::Skipped(SkipReason::Panicked(e.to_string()))
                        });
                    (path, result)
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut grouped: BTreeMap<StrategyIdentity, Vec<RunMetrics>> = BTreeMap::new();
        for (path, result) in results {
            match result {
                ReadResult::Parsed(run) => {
                    debug!(archive = %path.display(), key = %run.identity(), "Parsed run");
                    report.runs_parsed += 1;
                    grouped.entry(run.identity()).or_default().push(run);
                }
                ReadResult::Skipped(reason) => {
                    warn!(archive = %path.display(), reason = %reason, "Skipping archive");
                    *report.skipped.entry(reason.kind()).or_default() += 1;
                }
            }
        }
        grouped
    }

    /// Mark ratings whose strategy is not in the catalog as inactive, pulling
    /// in stored ratings the batch did not recompute. An empty catalog
    /// deactivates nothing.
    fn deactivate_missing(
        &self,
        ratings: &mut Vec<AggregatedRating>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if self.catalog.is_empty() {
            return Ok(0);
        }

        let mut deactivated = 0;
        for rating in ratings.iter_mut() {
            if rating.is_active && !self.catalog.contains(&rating.strategy_name) {
                rating.is_active = false;
                deactivated += 1;
            }
        }

        let rated: BTreeSet<(String, String, String)> = ratings
            .iter()
            .map(|r| {
                (
                    r.strategy_key.clone(),
                    r.exchange.clone(),
                    r.stake_currency.clone(),
                )
            })
            .collect();

        for mut stored in self.store.list()? {
            let key = (
                stored.strategy_key.clone(),
                stored.exchange.clone(),
                stored.stake_currency.clone(),
            );
            if rated.contains(&key)
                || !stored.is_active
                || self.catalog.contains(&stored.strategy_name)
            {
                continue;
            }
            debug!(key = %stored.strategy_key, "Strategy left the catalog");
            stored.is_active = false;
            stored.updated_at = now;
            ratings.push(stored);
            deactivated += 1;
        }

        Ok(deactivated)
    }
}

/// Every `*.zip` directly under `dir`, sorted by path.
async fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        warn!(dir = %dir.display(), error = %e, "Cannot list results directory");
        e
    })?;

    let mut archives = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip && entry.file_type().await?.is_file() {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}
