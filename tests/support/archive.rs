//! Result-archive fixtures written with the `zip` writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Write `entries` (name, contents) into a ZIP at `dir/file_name`.
pub fn write_zip(dir: &Path, file_name: &str, entries: &[(&str, String)]) {
    fs::create_dir_all(dir).expect("create results dir");
    let file = File::create(dir.join(file_name)).expect("create archive");
    let mut zip = ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        zip.write_all(contents.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish archive");
}

/// A nested-layout result document for one run.
pub fn nested_document(strategy: &str, profit_pct: f64, trades: u64) -> Value {
    json!({
        "strategy": {
            strategy: {
                "total_trades": trades,
                "profit_total_pct": profit_pct,
                "max_drawdown": 2.0,
                "sharpe": 0.5,
                "timeframe": "5m",
                "timerange": "20240101-20240201"
            }
        },
        "strategy_comparison": []
    })
}

/// Write a single-run archive named `file_name`.
pub fn write_run(dir: &Path, file_name: &str, strategy: &str, profit_pct: f64, trades: u64) {
    let document = nested_document(strategy, profit_pct, trades).to_string();
    write_zip(
        dir,
        file_name,
        &[(&format!("{}.json", file_name.trim_end_matches(".zip")), document)],
    );
}

/// Write a strategy source file into the strategies directory.
pub fn write_strategy(dir: &Path, name: &str, source: &str) {
    fs::create_dir_all(dir).expect("create strategies dir");
    fs::write(dir.join(format!("{name}.py")), source).expect("write strategy");
}

/// A clean strategy source with no lookahead patterns.
pub const CLEAN_SOURCE: &str = r#"
class EWO_A(IStrategy):
    def populate_indicators(self, dataframe, metadata):
        dataframe['ema'] = ta.EMA(dataframe, timeperiod=50)
        dataframe['vol'] = dataframe['volume'].rolling(24).mean()
        return dataframe
"#;

/// A source that peeks at the next candle.
pub const BIASED_SOURCE: &str = r#"
class Peek(IStrategy):
    def populate_entry_trend(self, dataframe, metadata):
        dataframe['next'] = dataframe['close'].shift(-1)
        return dataframe
"#;
