use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Page could not be fetched (network failure or 4xx/5xx status)
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Writing an artifact failed, including creating its parent directory
    #[error("failed to write {}: {message}", .path.display())]
    Persist { path: PathBuf, message: String },

    /// Expected input file is absent
    #[error("input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Malformed JSON or unreadable spreadsheet
    #[error("parse error ({context}): {message}")]
    Parse { context: String, message: String },

    /// Model reply does not contain the bracketed array
    #[error("could not find JSON array in model response: {0}")]
    Extraction(String),

    /// A parsed test case lacks required keys
    #[error("test case {index} missing required keys: {missing:?}")]
    Validation { index: usize, missing: Vec<String> },

    /// Model returned a different number of test cases than requested
    #[error("expected {expected} test cases, model returned {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// Missing credential or unusable settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Completion provider call failed or returned no text
    #[error("completion request to {provider} failed: {message}")]
    Completion { provider: String, message: String },

    /// A stage produced nothing to persist
    #[error("nothing to persist: {0}")]
    Empty(String),
}

impl PipelineError {
    pub fn persist(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        PipelineError::Persist {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn parse(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        PipelineError::Parse {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn completion(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        PipelineError::Completion {
            provider: provider.into(),
            message: err.to_string(),
        }
    }
}
