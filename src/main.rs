use clap::Parser;
use tracing::debug;

use stratrank::adapter::inbound::cli::command::{Cli, ColorChoice, Commands};
use stratrank::adapter::inbound::cli::output::{self, OutputConfig};
use stratrank::adapter::inbound::cli::{ingest, rankings, show, stats};
use stratrank::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let mut config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
    config.init_logging();
    debug!(config = %cli.config.display(), "Configuration loaded");

    let result = match &cli.command {
        Commands::Ingest(args) => ingest::execute(&config, args).await,
        Commands::Rankings(args) => rankings::execute(&config, args),
        Commands::Show(args) => show::execute(&config, args),
        Commands::Stats => stats::execute(&config),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
