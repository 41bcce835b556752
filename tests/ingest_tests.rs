mod support;

use std::path::Path;
use std::sync::Arc;

use stratrank::adapter::outbound::archive::ZipArchiveReader;
use stratrank::adapter::outbound::catalog::DirectoryCatalog;
use stratrank::adapter::outbound::file::FileRatingStore;
use stratrank::application::ingest::IngestService;
use stratrank::application::rating::RatingEngine;
use stratrank::domain::{Metric, StallReason, StrategySource};
use stratrank::port::{ArchiveReader, RatingStore, ReadResult, StrategyCatalog};
use tempfile::TempDir;

use support::archive::{write_run, write_strategy, write_zip, BIASED_SOURCE, CLEAN_SOURCE};
use support::rating::at;

const EWO_KEY: &str = "EWO_A_5m_20240101-20240201";

struct Workspace {
    _dir: TempDir,
    results: std::path::PathBuf,
    strategies: std::path::PathBuf,
    store: Arc<FileRatingStore>,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let strategies = dir.path().join("strategies");
        std::fs::create_dir_all(&results).unwrap();
        let store = Arc::new(FileRatingStore::new(dir.path().join("ratings")));
        Self {
            _dir: dir,
            results,
            strategies,
            store,
        }
    }

    fn service(&self) -> IngestService {
        self.service_with(Arc::new(ZipArchiveReader::default()))
    }

    fn service_with(&self, reader: Arc<dyn ArchiveReader>) -> IngestService {
        let catalog: Arc<dyn StrategyCatalog> =
            Arc::new(DirectoryCatalog::scan(&self.strategies).unwrap());
        IngestService::new(
            &self.results,
            4,
            reader,
            catalog,
            RatingEngine::standard("gateio", "USDT").unwrap(),
            Arc::clone(&self.store) as Arc<dyn RatingStore>,
        )
    }

    fn results(&self) -> &Path {
        &self.results
    }
}

#[tokio::test]
async fn two_runs_collapse_into_one_median_rating() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "EWO_A", CLEAN_SOURCE);
    write_run(ws.results(), "run-1.zip", "EWO_A", 2.0, 10);
    write_run(ws.results(), "run-2.zip", "EWO_A", 0.0, 10);

    let report = ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert_eq!(report.archives, 2);
    assert_eq!(report.runs_parsed, 2);
    assert_eq!(report.identities_rated, 1);
    assert_eq!(report.skipped_total(), 0);

    let rating = ws.store.get(EWO_KEY).unwrap().unwrap();
    assert_eq!(rating.total_backtests, 2);
    assert_eq!(rating.median(Metric::TotalProfitPct), 1.0);
    assert_eq!(rating.backtest_win_percentage, 50.0);
    assert!(!rating.is_stalled);
    assert!(rating.is_active);
    assert!(!rating.has_lookahead_bias);
    assert_eq!(
        rating.strategy_hash.as_deref(),
        Some(StrategySource::new(CLEAN_SOURCE).hash.as_str())
    );
    assert_eq!(rating.updated_at, at(1_700_000_000));
}

#[tokio::test]
async fn ninety_percent_negative_runs_stall_the_strategy() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "EWO_A", CLEAN_SOURCE);
    for i in 0..11 {
        write_run(ws.results(), &format!("neg-{i:02}.zip"), "EWO_A", -1.0, 10);
    }
    write_run(ws.results(), "pos.zip", "EWO_A", 1.0, 10);

    let report = ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert_eq!(report.stalled, 1);

    let rating = ws.store.get(EWO_KEY).unwrap().unwrap();
    assert_eq!(rating.total_backtests, 12);
    assert!(rating.is_stalled);
    assert_eq!(rating.stall_reason, Some(StallReason::NinetyPercentNegative));
    assert!(!rating.is_active);
}

#[tokio::test]
async fn new_losing_runs_flip_an_active_rating_to_stalled() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "EWO_A", CLEAN_SOURCE);
    write_run(ws.results(), "run-01.zip", "EWO_A", 3.0, 20);
    write_run(ws.results(), "run-02.zip", "EWO_A", -1.0, 15);

    ws.service().run_at(at(1_700_000_000)).await.unwrap();
    let before = ws.store.get(EWO_KEY).unwrap().unwrap();
    assert_eq!(before.median(Metric::TotalProfitPct), 1.0);
    assert_eq!(before.backtest_win_percentage, 50.0);
    assert!(before.is_active);
    assert!(!before.is_stalled);

    for i in 3..=12 {
        write_run(ws.results(), &format!("run-{i:02}.zip"), "EWO_A", -10.0, 15);
    }
    let report = ws.service().run_at(at(1_700_000_100)).await.unwrap();
    assert_eq!(report.identities_rated, 1);
    assert_eq!(report.stalled, 1);

    let after = ws.store.get(EWO_KEY).unwrap().unwrap();
    assert_eq!(after.total_backtests, 12);
    assert!(after.is_stalled);
    assert_eq!(
        after.stall_reason.map(|r| r.as_str()),
        Some("90_percent_negative")
    );
    assert!(!after.is_active);
    assert_eq!(after.updated_at, at(1_700_000_100));
    assert_eq!(ws.store.list().unwrap().len(), 1);
}

/// Panics on one archive, reads the rest normally.
struct PanicsOn(&'static str);

impl ArchiveReader for PanicsOn {
    fn read(&self, path: &Path) -> ReadResult {
        if path.file_name().is_some_and(|name| name == self.0) {
            panic!("reader failure on {}", path.display());
        }
        ZipArchiveReader::default().read(path)
    }
}

#[tokio::test]
async fn reader_panic_is_tallied_and_the_batch_continues() {
    let ws = Workspace::new();
    write_run(ws.results(), "good.zip", "EWO_A", 1.0, 5);
    write_run(ws.results(), "boom.zip", "EWO_A", 2.0, 5);

    let report = ws
        .service_with(Arc::new(PanicsOn("boom.zip")))
        .run_at(at(1_700_000_000))
        .await
        .unwrap();
    assert_eq!(report.archives, 2);
    assert_eq!(report.runs_parsed, 1);
    assert_eq!(report.skipped.get("panicked"), Some(&1));
    assert_eq!(ws.store.get(EWO_KEY).unwrap().unwrap().total_backtests, 1);
}

#[tokio::test]
async fn bad_archives_are_skipped_by_kind() {
    let ws = Workspace::new();
    write_run(ws.results(), "good.zip", "EWO_A", 1.0, 5);
    std::fs::write(ws.results().join("not-a-zip.zip"), b"plain text").unwrap();
    write_zip(ws.results(), "no-json.zip", &[("readme.txt", "hi".to_string())]);
    write_zip(ws.results(), "broken.zip", &[("result.json", "{ nope".to_string())]);
    write_zip(ws.results(), "empty.zip", &[("result.json", "{\"foo\": 1}".to_string())]);
    std::fs::write(ws.results().join("notes.txt"), b"ignored").unwrap();

    let report = ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert_eq!(report.archives, 5);
    assert_eq!(report.runs_parsed, 1);
    assert_eq!(report.skipped_total(), 4);
    assert_eq!(report.skipped.get("open"), Some(&1));
    assert_eq!(report.skipped.get("no_document"), Some(&1));
    assert_eq!(report.skipped.get("malformed"), Some(&1));
    assert_eq!(report.skipped.get("no_result_block"), Some(&1));
}

#[tokio::test]
async fn lookahead_source_marks_rating_biased() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "Peek", BIASED_SOURCE);
    write_run(ws.results(), "peek.zip", "Peek", 5.0, 40);

    ws.service().run_at(at(1_700_000_000)).await.unwrap();

    let rating = ws.store.get("Peek_5m_20240101-20240201").unwrap().unwrap();
    assert!(rating.has_lookahead_bias);
    assert!(rating.lookahead_issues.iter().any(|i| i == "FUTURE_SHIFT"));
    assert_eq!(rating.stall_reason, Some(StallReason::Biased));
    assert!(!rating.is_active);
}

#[tokio::test]
async fn strategies_missing_from_catalog_are_deactivated() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "EWO_A", CLEAN_SOURCE);
    write_run(ws.results(), "a.zip", "EWO_A", 1.0, 10);
    write_run(ws.results(), "b.zip", "Retired", 1.0, 10);

    let report = ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert_eq!(report.deactivated, 1);

    let retired = ws.store.get("Retired_5m_20240101-20240201").unwrap().unwrap();
    assert!(!retired.is_active);
    assert!(!retired.is_stalled);
    assert!(ws.store.get(EWO_KEY).unwrap().unwrap().is_active);
}

#[tokio::test]
async fn stored_ratings_leaving_the_catalog_are_deactivated_later() {
    let ws = Workspace::new();
    write_strategy(&ws.strategies, "EWO_A", CLEAN_SOURCE);
    write_strategy(&ws.strategies, "Old", CLEAN_SOURCE);
    write_run(ws.results(), "a.zip", "EWO_A", 1.0, 10);
    write_run(ws.results(), "old.zip", "Old", 1.0, 10);
    ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert!(ws.store.get("Old_5m_20240101-20240201").unwrap().unwrap().is_active);

    std::fs::remove_file(ws.strategies.join("Old.py")).unwrap();
    std::fs::remove_file(ws.results().join("old.zip")).unwrap();
    let report = ws.service().run_at(at(1_700_000_100)).await.unwrap();
    assert_eq!(report.identities_rated, 1);
    assert_eq!(report.deactivated, 1);

    let old = ws.store.get("Old_5m_20240101-20240201").unwrap().unwrap();
    assert!(!old.is_active);
    assert_eq!(old.updated_at, at(1_700_000_100));
    assert_eq!(ws.store.list().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_catalog_deactivates_nothing() {
    let ws = Workspace::new();
    write_run(ws.results(), "a.zip", "Anything", 1.0, 10);

    let report = ws.service().run_at(at(1_700_000_000)).await.unwrap();
    assert_eq!(report.deactivated, 0);
    assert!(ws.store.list().unwrap()[0].is_active);
}

#[tokio::test]
async fn reingesting_the_same_archives_is_idempotent() {
    let ws = Workspace::new();
    write_run(ws.results(), "a.zip", "EWO_A", 3.0, 10);
    write_run(ws.results(), "b.zip", "EWO_A", -1.0, 12);
    write_run(ws.results(), "c.zip", "Other", 0.5, 4);

    ws.service().run_at(at(1_700_000_000)).await.unwrap();
    let first = ws.store.list().unwrap();
    ws.service().run_at(at(1_700_000_000)).await.unwrap();
    let second = ws.store.list().unwrap();

    assert_eq!(first, second);
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn missing_results_directory_is_an_error() {
    let ws = Workspace::new();
    std::fs::remove_dir(ws.results()).unwrap();
    assert!(ws.service().run().await.is_err());
}
