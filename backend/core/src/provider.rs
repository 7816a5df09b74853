use async_trait::async_trait;

use crate::chat::ChatMessage;
use crate::error::RelayError;

/// A completion request: full message history plus per-role generation
/// parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Internal deliberation budget, for models that support it. When set,
    /// the provider requests an extended reasoning pass whose trace is kept
    /// separate from the final answer.
    pub reasoning_budget: Option<u32>,
}

/// A completion from a provider. `content` is the final answer text; any
/// intermediate deliberation the model produced lands in `reasoning` and is
/// never surfaced as the response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub reasoning: Option<String>,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Trait for text-completion collaborators.
///
/// The contract is "system instruction + message history in, text out";
/// transport and authentication are the implementor's concern.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g. "openrouter", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RelayError>;
}
