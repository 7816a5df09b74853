use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use relay_core::{ChatMessage, ChatProvider, CompletionRequest, CompletionResponse, RelayError};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const PROVIDER_NAME: &str = "openrouter";

/// OpenRouter-compatible chat-completions provider.
///
/// Endpoint and credential are optional at construction; a missing credential
/// surfaces as a configuration error on the first call, so startup never
/// fails just because the environment is incomplete.
pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenRouterProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn credential(&self) -> Result<&str, RelayError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(RelayError::Config(
                "OPENROUTER_API_KEY is not set".to_string(),
            )),
        }
    }
}

impl Default for OpenRouterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<ReasoningOptions>,
}

#[derive(Serialize)]
struct ReasoningOptions {
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
    /// Deliberation trace, present when a reasoning budget was requested.
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn provider_err(message: impl std::fmt::Display) -> RelayError {
    RelayError::Provider {
        provider: PROVIDER_NAME.to_string(),
        message: message.to_string(),
    }
}

fn malformed(reason: impl Into<String>) -> RelayError {
    RelayError::MalformedResponse {
        provider: PROVIDER_NAME.to_string(),
        reason: reason.into(),
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RelayError> {
        let api_key = self.credential()?;
        let start = Instant::now();

        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            reasoning: request
                .reasoning_budget
                .map(|max_tokens| ReasoningOptions { max_tokens }),
        };

        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(provider_err)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(provider_err(format!("{}: {}", status, error_body)));
        }

        let reply: ChatCompletionReply = response
            .json()
            .await
            .map_err(|e| malformed(format!("invalid JSON body: {}", e)))?;

        // Never index into the choice array unconditionally; provider
        // responses do not guarantee its shape.
        let message = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| malformed("response contained no choices"))?
            .message;

        let content = message.content.unwrap_or_default();
        if content.is_empty() {
            return Err(if message.reasoning.is_some() {
                malformed("deliberation trace without final answer text")
            } else {
                malformed("empty completion content")
            });
        }

        Ok(CompletionResponse {
            content,
            reasoning: message.reasoning,
            model: request.model.clone(),
            tokens_used: reply.usage.and_then(|u| u.total_tokens).unwrap_or(0),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
