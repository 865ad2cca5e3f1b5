use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::llm::credentials::CredentialProvider;
use crate::llm::{CompletionRequest, TextCompletion};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Gemini Backend
// ============================================================================

pub struct GeminiBackend {
    pub endpoint: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<PartOut<'a>>,
}

#[derive(Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Deserialize)]
struct PartIn {
    #[serde(default)]
    text: String,
}

impl GeminiBackend {
    /// Fails with `Configuration` when the provider has no key.
    pub fn new(endpoint: &str, credentials: &dyn CredentialProvider) -> Result<Self> {
        let api_key = credentials.api_key().ok_or_else(|| {
            PipelineError::Configuration("API key for the gemini provider not found".into())
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Replace the HTTP client (proxy settings, TLS, timeouts).
    pub fn with_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

/// Concatenate the text parts of the first candidate.
pub fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::completion("gemini", e))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(PipelineError::completion("gemini", "response contained no text"));
    }
    Ok(text)
}

impl TextCompletion for GeminiBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartOut {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        debug!("POST {} (model={})", self.url(&request.model), request.model);
        let response = self
            .client
            .post(self.url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| PipelineError::completion("gemini", e))?
            .error_for_status()
            .map_err(|e| PipelineError::completion("gemini", e))?;

        let text = response
            .text()
            .map_err(|e| PipelineError::completion("gemini", e))?;
        parse_generate_response(&text)
    }
}
