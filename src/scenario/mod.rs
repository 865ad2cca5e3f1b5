pub mod model;
pub mod prompt;
pub mod response;

use std::path::Path;

use tracing::{debug, error, info};

use crate::error::{PipelineError, Result};
use crate::extractor::inventory::ElementInventory;
use crate::llm::{CompletionRequest, TextCompletion};
use crate::sheet::write_records;
use crate::trace::{EventSink, NoopSink, Stage, StageStatus, TraceEvent};

use model::TestCase;
use prompt::render_scenario_prompt;
use response::{ResponsePolicy, parse_test_cases};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const SCENARIO_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSettings {
    pub model: String,
    pub temperature: f32,
    pub policy: ResponsePolicy,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: SCENARIO_TEMPERATURE,
            policy: ResponsePolicy::default(),
        }
    }
}

/// Stage 2: turn an element inventory into test cases.
pub struct ScenarioSynthesizer {
    completion: Box<dyn TextCompletion>,
    settings: ScenarioSettings,
    sink: Box<dyn EventSink>,
}

impl ScenarioSynthesizer {
    pub fn new(completion: Box<dyn TextCompletion>, settings: ScenarioSettings) -> Self {
        Self {
            completion,
            settings,
            sink: Box::new(NoopSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    /// Read the inventory written by the extractor.
    pub fn load(path: &Path) -> Result<ElementInventory> {
        if !path.exists() {
            let err = PipelineError::NotFound {
                path: path.to_path_buf(),
            };
            error!("Failed to load elements JSON: {}", err);
            return Err(err);
        }

        let inventory = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::parse(path.display().to_string(), e))
            .and_then(|text| {
                serde_json::from_str::<ElementInventory>(&text)
                    .map_err(|e| PipelineError::parse(path.display().to_string(), e))
            })
            .inspect_err(|e| error!("Failed to load elements JSON: {}", e))?;

        debug!(
            "Loaded {} elements from {}",
            inventory.total(),
            path.display()
        );
        Ok(inventory)
    }

    /// Ask the model for test cases covering the inventory.
    pub fn generate(&self, inventory: &ElementInventory) -> Result<Vec<TestCase>> {
        info!("Starting test case generation");

        let prompt = render_scenario_prompt(inventory)?;
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            prompt,
            temperature: self.settings.temperature,
        };
        debug!("Invoking model {} ({} prompt chars)", request.model, request.prompt.len());

        let response = self
            .completion
            .complete(&request)
            .inspect_err(|e| error!("Failed to generate test cases: {}", e))?;
        debug!("Raw LLM response: {}", response);

        let cases = parse_test_cases(&response, &self.settings.policy).inspect_err(|e| {
            error!("Failed to format response: {}", e);
            error!("Raw response: {}", response);
        })?;

        info!("Successfully generated {} test cases", cases.len());
        Ok(cases)
    }

    /// Write test cases as spreadsheet rows. An empty set is refused.
    pub fn persist(&self, cases: &[TestCase], path: &Path) -> Result<()> {
        if cases.is_empty() {
            let err = PipelineError::Empty("no test cases were generated".into());
            error!("Failed to export test cases: {}", err);
            return Err(err);
        }

        write_records(path, cases)
            .inspect_err(|e| error!("Failed to export test cases: {}", e))?;
        info!("Successfully exported test cases to {}", path.display());
        Ok(())
    }

    /// Load, generate and persist in one go.
    pub fn export(&self, inventory_path: &Path, output_path: &Path) -> Result<Vec<TestCase>> {
        self.sink
            .emit(&TraceEvent::now(Stage::Scenarios, StageStatus::Started));

        let result = Self::load(inventory_path).and_then(|inventory| {
            let cases = self.generate(&inventory)?;
            self.persist(&cases, output_path)?;
            Ok(cases)
        });

        let event = match &result {
            Ok(cases) => TraceEvent::now(Stage::Scenarios, StageStatus::Completed)
                .with_artifact(output_path)
                .with_records(cases.len()),
            Err(e) => TraceEvent::now(Stage::Scenarios, StageStatus::Failed).with_error(e),
        };
        self.sink.emit(&event);

        result
    }
}
