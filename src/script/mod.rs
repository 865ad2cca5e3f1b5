pub mod model;
pub mod prompt;

use std::path::Path;

use tracing::{debug, error, info};

use crate::error::{PipelineError, Result};
use crate::llm::{CompletionRequest, TextCompletion};
use crate::scenario::DEFAULT_MODEL;
use crate::scenario::model::TestCase;
use crate::sheet::{read_records, write_records};
use crate::trace::{EventSink, NoopSink, Stage, StageStatus, TraceEvent};

use model::ScriptRecord;
use prompt::render_script_prompt;

/// Lower than the scenario temperature: code generation favours determinism.
pub const SCRIPT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: SCRIPT_TEMPERATURE,
        }
    }
}

/// Stage 3: turn each test case into a Selenium script.
pub struct ScriptSynthesizer {
    completion: Box<dyn TextCompletion>,
    settings: ScriptSettings,
    sink: Box<dyn EventSink>,
}

impl ScriptSynthesizer {
    pub fn new(completion: Box<dyn TextCompletion>, settings: ScriptSettings) -> Self {
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

    pub fn settings(&self) -> &ScriptSettings {
        &self.settings
    }

    /// Read the test-case spreadsheet written by the scenario stage.
    pub fn load(path: &Path) -> Result<Vec<TestCase>> {
        let cases = read_records::<TestCase>(path)
            .inspect_err(|e| error!("Failed to load test cases: {}", e))?;
        debug!("Loaded {} test cases from {}", cases.len(), path.display());
        Ok(cases)
    }

    /// Generate the script text for one test case, trimmed of surrounding
    /// whitespace.
    pub fn generate_one(&self, case: &TestCase) -> Result<String> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            prompt: render_script_prompt(case),
            temperature: self.settings.temperature,
        };

        let response = self
            .completion
            .complete(&request)
            .inspect_err(|e| error!("Failed to generate Selenium script: {}", e))?;
        debug!(
            "Generated {} chars of script for {}",
            response.len(),
            case.test_case_id
        );
        Ok(response.trim().to_string())
    }

    /// One model call per case, in order. The first failure aborts the batch.
    pub fn generate_all(&self, cases: &[TestCase]) -> Result<Vec<ScriptRecord>> {
        cases
            .iter()
            .map(|case| {
                let selenium_script = self.generate_one(case)?;
                Ok(ScriptRecord {
                    test_case_id: case.test_case_id.clone(),
                    test_scenario: case.test_scenario.clone(),
                    selenium_script,
                })
            })
            .collect()
    }

    pub fn persist(&self, records: &[ScriptRecord], path: &Path) -> Result<()> {
        if records.is_empty() {
            let err = PipelineError::Empty("no scripts were generated".into());
            error!("Failed to export Selenium scripts: {}", err);
            return Err(err);
        }

        write_records(path, records)
            .inspect_err(|e| error!("Failed to export Selenium scripts: {}", e))?;
        info!("Successfully exported Selenium scripts to {}", path.display());
        Ok(())
    }

    /// Load, generate and persist in one go. Nothing is written unless every
    /// script was generated.
    pub fn export(&self, test_cases_path: &Path, output_path: &Path) -> Result<Vec<ScriptRecord>> {
        self.sink
            .emit(&TraceEvent::now(Stage::Scripts, StageStatus::Started));

        let result = Self::load(test_cases_path).and_then(|cases| {
            let records = self.generate_all(&cases)?;
            self.persist(&records, output_path)?;
            Ok(records)
        });

        let event = match &result {
            Ok(records) => TraceEvent::now(Stage::Scripts, StageStatus::Completed)
                .with_artifact(output_path)
                .with_records(records.len()),
            Err(e) => TraceEvent::now(Stage::Scripts, StageStatus::Failed).with_error(e),
        };
        self.sink.emit(&event);

        result
    }
}
