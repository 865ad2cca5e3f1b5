pub mod credentials;
pub mod gemini;
pub mod ollama;
pub mod template;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::error::{PipelineError, Result};

pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;

// ============================================================================
// TextCompletion trait — prompt in, full text out
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

/// A text-generation service. Blocks until the complete reply is available.
pub trait TextCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

// ============================================================================
// Mock backends (for testing without a provider)
// ============================================================================

/// Returns the same canned response for every request.
pub struct MockCompletion {
    pub response: String,
}

impl TextCompletion for MockCompletion {
    fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Replays a queue of responses in order and records every request it saw.
/// Fails once the queue is exhausted.
pub struct ScriptedCompletion {
    responses: RefCell<VecDeque<Result<String>>>,
    requests: RefCell<Vec<CompletionRequest>>,
    calls: Cell<usize>,
}

impl ScriptedCompletion {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    pub fn from_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(t.into())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.borrow().clone()
    }
}

impl TextCompletion for ScriptedCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(PipelineError::completion("scripted", "no responses left")))
    }
}

impl<T: TextCompletion + ?Sized> TextCompletion for std::rc::Rc<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }
}
