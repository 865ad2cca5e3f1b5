use std::path::PathBuf;

use clap::Parser;
use ui_testgen::cli::commands::{build_completion, cmd_extract, cmd_run};
use ui_testgen::cli::config::{AppConfig, Cli, Commands, PipelineConfig, Provider, load_config};
use ui_testgen::error::PipelineError;
use ui_testgen::extractor::fetch::HttpFetcher;
use ui_testgen::llm::credentials::StaticCredentials;

use crate::common::utils::page;

mod common;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_extract_minimal() {
    let cli = Cli::parse_from(["ui-testgen", "extract"]);
    match cli.command {
        Commands::Extract { url, output } => {
            assert!(url.is_none());
            assert!(output.is_none());
        }
        _ => panic!("Expected Extract command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_scenarios_all_args() {
    let cli = Cli::parse_from([
        "ui-testgen",
        "scenarios",
        "--input",
        "in.json",
        "-o",
        "out.xlsx",
        "--strict",
        "--enforce-count",
        "--provider",
        "ollama",
        "-vv",
    ]);
    match cli.command {
        Commands::Scenarios {
            input,
            output,
            strict,
            enforce_count,
        } => {
            assert_eq!(input.as_deref(), Some("in.json"));
            assert_eq!(output.as_deref(), Some("out.xlsx"));
            assert!(strict);
            assert!(enforce_count);
        }
        _ => panic!("Expected Scenarios command"),
    }
    assert_eq!(cli.provider.as_deref(), Some("ollama"));
    assert_eq!(cli.verbose, 2);
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["ui-testgen", "explore"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config.target.url, "https://demoblaze.com");
    assert_eq!(config.output.elements, "output/elements.json");
}

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.target.url, "https://demoblaze.com");
    assert_eq!(config.output.test_cases, "output/test_cases.xlsx");
    assert_eq!(config.output.test_scripts, "output/test_scripts.xlsx");
    assert_eq!(config.llm.provider, "gemini");
    assert!(config.llm.model.is_none());
    assert_eq!(config.llm.api_key_env, "GOOGLE_API_KEY");
    assert!(config.llm.endpoint.is_none());
    assert!(!config.generation.strict_array);
    assert_eq!(config.generation.scenario_temperature, 0.7);
    assert_eq!(config.generation.script_temperature, 0.3);
}

#[test]
fn config_partial_yaml() {
    let yaml = r#"
target:
  url: "https://shop.test"
llm:
  provider: ollama
  model: "llama3"
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.target.url, "https://shop.test");
    assert_eq!(config.llm.model.as_deref(), Some("llama3"));
    // Other sections get defaults
    assert_eq!(config.llm.api_key_env, "GOOGLE_API_KEY");
    assert_eq!(config.output.elements, "output/elements.json");
    assert_eq!(config.generation.script_temperature, 0.3);
}

#[test]
fn config_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui-testgen.yaml");
    std::fs::write(&path, "target: [unclosed").unwrap();
    let config = load_config(path.to_str());
    assert_eq!(config.target.url, "https://demoblaze.com");
}

// ============================================================================
// Resolution Tests
// ============================================================================

#[test]
fn resolve_prefers_cli_over_config() {
    let mut config = AppConfig::default();
    config.target.url = "https://from-config.test".into();
    config.llm.provider = "ollama".into();
    config.generation.strict_array = true;

    let cli = Cli::parse_from([
        "ui-testgen",
        "extract",
        "--url",
        "https://from-cli.test",
        "-o",
        "x/elements.json",
        "--model",
        "m1",
    ]);
    let resolved = PipelineConfig::resolve(&cli, &config).unwrap();

    assert_eq!(resolved.url, "https://from-cli.test");
    assert_eq!(resolved.elements_path, PathBuf::from("x/elements.json"));
    assert_eq!(resolved.provider, Provider::Ollama);
    assert_eq!(resolved.endpoint, "http://localhost:11434/api/generate");
    assert_eq!(resolved.scenario.model, "m1");
    assert_eq!(resolved.script.model, "m1");
    assert!(resolved.scenario.policy.strict_array);
    assert_eq!(resolved.scenario.temperature, 0.7);
    assert_eq!(resolved.script.temperature, 0.3);
}

#[test]
fn resolve_scripts_paths() {
    let cli = Cli::parse_from(["ui-testgen", "scripts", "-i", "cases.xlsx", "-o", "scripts.xlsx"]);
    let resolved = PipelineConfig::resolve(&cli, &AppConfig::default()).unwrap();
    assert_eq!(resolved.test_cases_path, PathBuf::from("cases.xlsx"));
    assert_eq!(resolved.test_scripts_path, PathBuf::from("scripts.xlsx"));
    assert_eq!(resolved.provider, Provider::Gemini);
    assert_eq!(
        resolved.endpoint,
        "https://generativelanguage.googleapis.com/v1beta"
    );
}

#[test]
fn resolve_picks_model_default_from_provider() {
    let cli = Cli::parse_from(["ui-testgen", "scenarios", "--provider", "ollama"]);
    let resolved = PipelineConfig::resolve(&cli, &AppConfig::default()).unwrap();
    assert_eq!(resolved.provider, Provider::Ollama);
    assert_eq!(resolved.scenario.model, "qwen2.5:1.5b");
    assert_eq!(resolved.script.model, "qwen2.5:1.5b");

    let cli = Cli::parse_from(["ui-testgen", "scenarios"]);
    let resolved = PipelineConfig::resolve(&cli, &AppConfig::default()).unwrap();
    assert_eq!(resolved.scenario.model, "gemini-1.5-flash");
}

#[test]
fn resolve_rejects_unknown_provider() {
    let cli = Cli::parse_from(["ui-testgen", "run", "--provider", "palm"]);
    let err = PipelineConfig::resolve(&cli, &AppConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
}

// ============================================================================
// Command Tests
// ============================================================================

fn config_in(dir: &std::path::Path, url: &str) -> PipelineConfig {
    let cli = Cli::parse_from(["ui-testgen", "run", "--url", url]);
    let mut resolved = PipelineConfig::resolve(&cli, &AppConfig::default()).unwrap();
    resolved.elements_path = dir.join("elements.json");
    resolved.test_cases_path = dir.join("test_cases.xlsx");
    resolved.test_scripts_path = dir.join("test_scripts.xlsx");
    resolved
}

#[test]
fn gemini_without_credential_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "https://example.com");
    let err = build_completion(&config, &StaticCredentials(None)).err().unwrap();
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn ollama_needs_no_credential() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), "https://example.com");
    config.provider = Provider::Ollama;
    assert!(build_completion(&config, &StaticCredentials(None)).is_ok());
}

#[test]
fn run_fails_fast_without_credential() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), &page("store_page.html"));

    let err = cmd_run(&config, Box::new(HttpFetcher::new()), &StaticCredentials(None)).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
    assert!(!config.elements_path.exists());
}

#[test]
fn extract_command_writes_inventory_and_trace() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), &page("store_page.html"));
    let trace = dir.path().join("trace.jsonl");
    config.trace_path = Some(trace.to_string_lossy().into_owned());

    let inventory = cmd_extract(&config, Box::new(HttpFetcher::new())).unwrap();
    assert_eq!(inventory.forms.len(), 2);
    assert!(config.elements_path.exists());

    let lines: Vec<serde_json::Value> = std::fs::read_to_string(&trace)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["stage"], "extract");
    assert_eq!(lines[0]["status"], "started");
    assert_eq!(lines[1]["status"], "completed");
    assert_eq!(lines[1]["records"], inventory.total());
}
