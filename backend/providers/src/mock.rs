use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use relay_core::{ChatProvider, CompletionRequest, CompletionResponse, RelayError};

/// A mock provider with scripted responses, for tests.
///
/// Responses are popped in order; once the script runs out, the fallback
/// text is returned. Every request received is recorded for inspection.
pub struct MockProvider {
    name: String,
    fallback: String,
    script: Mutex<VecDeque<Result<CompletionResponse, RelayError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: "Mock response".to_string(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Queue a plain text response.
    pub fn push_response(&self, content: impl Into<String>) {
        self.push(Ok(self.canned(content.into(), None)));
    }

    /// Queue a response that carries a deliberation trace alongside the
    /// final answer text.
    pub fn push_reasoning_response(&self, content: impl Into<String>, trace: impl Into<String>) {
        self.push(Ok(self.canned(content.into(), Some(trace.into()))));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: RelayError) {
        self.push(Err(err));
    }

    /// All requests this provider has received, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, item: Result<CompletionResponse, RelayError>) {
        self.script.lock().unwrap().push_back(item);
    }

    fn canned(&self, content: String, reasoning: Option<String>) -> CompletionResponse {
        CompletionResponse {
            content,
            reasoning,
            model: "mock".to_string(),
            tokens_used: 0,
            latency_ms: 0,
        }
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RelayError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(item) => item,
            None => Ok(self.canned(self.fallback.clone(), None)),
        }
    }
}
