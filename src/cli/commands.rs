use tracing::info;

use crate::cli::config::{PipelineConfig, Provider};
use crate::error::Result;
use crate::extractor::Extractor;
use crate::extractor::fetch::PageFetcher;
use crate::extractor::inventory::ElementInventory;
use crate::llm::credentials::CredentialProvider;
use crate::llm::{GeminiBackend, OllamaBackend, TextCompletion};
use crate::scenario::ScenarioSynthesizer;
use crate::scenario::model::TestCase;
use crate::script::ScriptSynthesizer;
use crate::script::model::ScriptRecord;
use crate::trace::{EventSink, NoopSink, TraceLogger};

// ============================================================================
// extract subcommand
// ============================================================================

pub fn cmd_extract(
    config: &PipelineConfig,
    fetcher: Box<dyn PageFetcher>,
) -> Result<ElementInventory> {
    let extractor = Extractor::new(&config.url, fetcher).with_sink(build_sink(config));
    let inventory = extractor.run(&config.elements_path)?;

    println!(
        "Extracted {} buttons, {} links, {} inputs, {} forms -> {}",
        inventory.buttons.len(),
        inventory.links.len(),
        inventory.inputs.len(),
        inventory.forms.len(),
        config.elements_path.display()
    );
    Ok(inventory)
}

// ============================================================================
// scenarios subcommand
// ============================================================================

pub fn cmd_scenarios(
    config: &PipelineConfig,
    completion: Box<dyn TextCompletion>,
) -> Result<Vec<TestCase>> {
    let synthesizer = ScenarioSynthesizer::new(completion, config.scenario.clone())
        .with_sink(build_sink(config));
    let cases = synthesizer.export(&config.elements_path, &config.test_cases_path)?;

    println!(
        "Generated {} test cases -> {}",
        cases.len(),
        config.test_cases_path.display()
    );
    for case in &cases {
        println!("  - {}: {}", case.test_case_id, case.test_scenario);
    }
    Ok(cases)
}

// ============================================================================
// scripts subcommand
// ============================================================================

pub fn cmd_scripts(
    config: &PipelineConfig,
    completion: Box<dyn TextCompletion>,
) -> Result<Vec<ScriptRecord>> {
    let synthesizer =
        ScriptSynthesizer::new(completion, config.script.clone()).with_sink(build_sink(config));
    let records = synthesizer.export(&config.test_cases_path, &config.test_scripts_path)?;

    println!(
        "Generated {} Selenium scripts -> {}",
        records.len(),
        config.test_scripts_path.display()
    );
    Ok(records)
}

// ============================================================================
// run subcommand
// ============================================================================

/// All three stages in order. The credential is checked before scraping so a
/// missing key fails before any work is done.
pub fn cmd_run(
    config: &PipelineConfig,
    fetcher: Box<dyn PageFetcher>,
    credentials: &dyn CredentialProvider,
) -> Result<()> {
    let scenario_backend = build_completion(config, credentials)?;
    let script_backend = build_completion(config, credentials)?;

    cmd_extract(config, fetcher)?;
    cmd_scenarios(config, scenario_backend)?;
    cmd_scripts(config, script_backend)?;

    info!("Pipeline complete for {}", config.url);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the completion backend for the configured provider. Gemini needs an
/// API key and fails with `Configuration` without one.
pub fn build_completion(
    config: &PipelineConfig,
    credentials: &dyn CredentialProvider,
) -> Result<Box<dyn TextCompletion>> {
    match config.provider {
        Provider::Gemini => Ok(Box::new(GeminiBackend::new(&config.endpoint, credentials)?)),
        Provider::Ollama => Ok(Box::new(OllamaBackend::new(&config.endpoint)?)),
    }
}

fn build_sink(config: &PipelineConfig) -> Box<dyn EventSink> {
    match &config.trace_path {
        Some(path) => Box::new(TraceLogger::new(path)),
        None => Box::new(NoopSink),
    }
}
