//! `stratrank ingest`.

use serde_json::json;

use crate::adapter::inbound::cli::command::IngestArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{build_ingest_service, build_rating_store};

/// Run one ingestion batch and print its report.
pub async fn execute(config: &Config, args: &IngestArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(dir) = &args.results_dir {
        config.paths.results_dir.clone_from(dir);
    }
    if let Some(workers) = args.workers {
        config.ingest.workers = workers.max(1);
    }

    let store = build_rating_store(&config);
    let service = build_ingest_service(&config, store)?;
    let report = service.run().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "ingest",
            "report": report,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Ingestion");
    output::field("Results", config.paths.results_dir.display());
    output::field("Archives", report.archives);
    output::field("Runs parsed", report.runs_parsed);
    output::field("Skipped", report.skipped_total());
    for (kind, count) in &report.skipped {
        output::field(&format!("  {kind}"), output::muted(count));
    }
    output::field("Identities rated", report.identities_rated);
    output::field("Stalled", report.stalled);
    output::field("Deactivated", report.deactivated);
    output::success("Ratings written");
    output::hint(&format!(
        "run {} to see the leaderboard",
        output::highlight("stratrank rankings")
    ));
    Ok(())
}
