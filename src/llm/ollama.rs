use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::llm::{CompletionRequest, TextCompletion};

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:1.5b";

// ============================================================================
// Ollama Backend
// ============================================================================

pub struct OllamaBackend {
    pub endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Replace the HTTP client (proxy settings, TLS, timeouts).
    pub fn with_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }
}

impl TextCompletion for OllamaBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = OllamaRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        debug!("POST {} (model={})", self.endpoint, request.model);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| PipelineError::completion("ollama", e))?
            .error_for_status()
            .map_err(|e| PipelineError::completion("ollama", e))?;

        let ollama_response: OllamaResponse = response
            .json()
            .map_err(|e| PipelineError::completion("ollama", e))?;
        Ok(ollama_response.response)
    }
}
