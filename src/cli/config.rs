use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::llm::gemini::DEFAULT_GEMINI_ENDPOINT;
use crate::llm::ollama::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL};
use crate::scenario::response::ResponsePolicy;
use crate::scenario::{DEFAULT_MODEL, SCENARIO_TEMPERATURE, ScenarioSettings};
use crate::script::{SCRIPT_TEMPERATURE, ScriptSettings};

pub const DEFAULT_CONFIG_FILE: &str = "ui-testgen.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-testgen",
    version,
    about = "Scrape UI elements, draft test cases and generate Selenium scripts with an LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ui-testgen.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Completion provider: gemini or ollama
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Provider endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Append stage events as JSON lines to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape a page and write its UI element inventory as JSON
    Extract {
        /// Page to scrape
        #[arg(long)]
        url: Option<String>,

        /// Inventory output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate test cases from an element inventory
    Scenarios {
        /// Inventory JSON path
        #[arg(short, long)]
        input: Option<String>,

        /// Test case spreadsheet output path
        #[arg(short, long)]
        output: Option<String>,

        /// Require the model reply to be exactly a JSON array
        #[arg(long)]
        strict: bool,

        /// Fail unless exactly 5 test cases are returned
        #[arg(long)]
        enforce_count: bool,
    },

    /// Generate a Selenium script for every test case
    Scripts {
        /// Test case spreadsheet path
        #[arg(short, long)]
        input: Option<String>,

        /// Script spreadsheet output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run all three stages in sequence
    Run {
        /// Page to scrape
        #[arg(long)]
        url: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-testgen.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_elements")]
    pub elements: String,

    #[serde(default = "default_test_cases")]
    pub test_cases: String,

    #[serde(default = "default_test_scripts")]
    pub test_scripts: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            elements: default_elements(),
            test_cases: default_test_cases(),
            test_scripts: default_test_scripts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Falls back to the provider's default model when unset
    pub model: Option<String>,

    pub endpoint: Option<String>,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            endpoint: None,
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub strict_array: bool,

    #[serde(default)]
    pub enforce_count: bool,

    #[serde(default = "default_scenario_temperature")]
    pub scenario_temperature: f32,

    #[serde(default = "default_script_temperature")]
    pub script_temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strict_array: false,
            enforce_count: false,
            scenario_temperature: SCENARIO_TEMPERATURE,
            script_temperature: SCRIPT_TEMPERATURE,
        }
    }
}

// Serde default helpers
fn default_url() -> String { "https://demoblaze.com".to_string() }
fn default_elements() -> String { "output/elements.json".to_string() }
fn default_test_cases() -> String { "output/test_cases.xlsx".to_string() }
fn default_test_scripts() -> String { "output/test_scripts.xlsx".to_string() }
fn default_provider() -> String { "gemini".to_string() }
fn default_api_key_env() -> String { "GOOGLE_API_KEY".to_string() }
fn default_scenario_temperature() -> f32 { SCENARIO_TEMPERATURE }
fn default_script_temperature() -> f32 { SCRIPT_TEMPERATURE }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Ollama,
}

impl FromStr for Provider {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "ollama" => Ok(Provider::Ollama),
            other => Err(PipelineError::Configuration(format!(
                "unknown provider '{}' (expected gemini or ollama)",
                other
            ))),
        }
    }
}

impl Provider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_ENDPOINT,
            Provider::Ollama => DEFAULT_OLLAMA_ENDPOINT,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_MODEL,
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

/// Everything the stages need, resolved once and handed to constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub url: String,
    pub elements_path: PathBuf,
    pub test_cases_path: PathBuf,
    pub test_scripts_path: PathBuf,
    pub provider: Provider,
    pub endpoint: String,
    pub api_key_env: String,
    pub scenario: ScenarioSettings,
    pub script: ScriptSettings,
    pub trace_path: Option<String>,
}

impl PipelineConfig {
    /// Merge CLI flags over the config file. CLI > config > defaults.
    pub fn resolve(cli: &Cli, config: &AppConfig) -> Result<Self> {
        let provider: Provider = cli
            .provider
            .as_deref()
            .unwrap_or(config.llm.provider.as_str())
            .parse()?;
        let model = cli
            .model
            .clone()
            .or_else(|| config.llm.model.clone())
            .unwrap_or_else(|| provider.default_model().to_string());
        let endpoint = cli
            .endpoint
            .clone()
            .or_else(|| config.llm.endpoint.clone())
            .unwrap_or_else(|| provider.default_endpoint().to_string());

        let mut url = config.target.url.clone();
        let mut elements = config.output.elements.clone();
        let mut test_cases = config.output.test_cases.clone();
        let mut test_scripts = config.output.test_scripts.clone();
        let mut policy = ResponsePolicy {
            strict_array: config.generation.strict_array,
            enforce_count: config.generation.enforce_count,
        };

        match &cli.command {
            Commands::Extract { url: u, output } => {
                override_with(&mut url, u);
                override_with(&mut elements, output);
            }
            Commands::Scenarios {
                input,
                output,
                strict,
                enforce_count,
            } => {
                override_with(&mut elements, input);
                override_with(&mut test_cases, output);
                policy.strict_array |= *strict;
                policy.enforce_count |= *enforce_count;
            }
            Commands::Scripts { input, output } => {
                override_with(&mut test_cases, input);
                override_with(&mut test_scripts, output);
            }
            Commands::Run { url: u } => override_with(&mut url, u),
        }

        Ok(Self {
            url,
            elements_path: PathBuf::from(elements),
            test_cases_path: PathBuf::from(test_cases),
            test_scripts_path: PathBuf::from(test_scripts),
            provider,
            endpoint,
            api_key_env: config.llm.api_key_env.clone(),
            scenario: ScenarioSettings {
                model: model.clone(),
                temperature: config.generation.scenario_temperature,
                policy,
            },
            script: ScriptSettings {
                model,
                temperature: config.generation.script_temperature,
            },
            trace_path: cli.trace.clone(),
        })
    }
}

fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}
