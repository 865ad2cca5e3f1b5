use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ui_testgen::cli::commands::{build_completion, cmd_extract, cmd_run, cmd_scenarios, cmd_scripts};
use ui_testgen::cli::config::{Cli, Commands, PipelineConfig, load_config};
use ui_testgen::extractor::fetch::HttpFetcher;
use ui_testgen::llm::credentials::EnvCredentials;

fn main() {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("Script failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> ui_testgen::Result<()> {
    let config = load_config(cli.config.as_deref());
    let pipeline = PipelineConfig::resolve(cli, &config)?;
    let credentials = EnvCredentials::new(&pipeline.api_key_env);

    match cli.command {
        Commands::Extract { .. } => {
            cmd_extract(&pipeline, Box::new(HttpFetcher::new()))?;
        }
        Commands::Scenarios { .. } => {
            let backend = build_completion(&pipeline, &credentials)?;
            cmd_scenarios(&pipeline, backend)?;
        }
        Commands::Scripts { .. } => {
            let backend = build_completion(&pipeline, &credentials)?;
            cmd_scripts(&pipeline, backend)?;
        }
        Commands::Run { .. } => {
            cmd_run(&pipeline, Box::new(HttpFetcher::new()), &credentials)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins; otherwise -v raises the level from info.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .init();
}
