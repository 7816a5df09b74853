use std::sync::Arc;

use tracing::debug;

use relay_core::{ChatMessage, ChatProvider, CompletionRequest, RelayError};

use crate::profiles::RoleProfile;

/// One specialized role: a provider handle plus the model profile to call
/// it with.
///
/// The contract is `invoke(system_instruction, history) -> text`. Only the
/// final answer text is returned; a deliberation trace, if any, is dropped
/// here and never reaches the caller.
#[derive(Clone)]
pub struct Invoker {
    provider: Arc<dyn ChatProvider>,
    profile: RoleProfile,
}

impl Invoker {
    pub fn new(provider: Arc<dyn ChatProvider>, profile: RoleProfile) -> Self {
        Self { provider, profile }
    }

    pub fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    pub async fn invoke(
        &self,
        instruction: &str,
        history: &[ChatMessage],
    ) -> Result<String, RelayError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(instruction));
        messages.extend_from_slice(history);

        let request = CompletionRequest {
            model: self.profile.model.clone(),
            messages,
            max_tokens: self.profile.max_tokens,
            temperature: self.profile.temperature,
            reasoning_budget: self.profile.reasoning_budget,
        };

        let response = self.provider.complete(&request).await?;
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "completion finished"
        );
        Ok(response.content)
    }
}

/// The four role invokers the pipeline needs, dependency-injected rather
/// than held as process-wide singletons so tests can swap in doubles.
#[derive(Clone)]
pub struct InvokerSet {
    pub router: Invoker,
    pub code: Invoker,
    pub reasoning: Invoker,
    pub conversational: Invoker,
}

impl InvokerSet {
    pub fn new(router: Invoker, code: Invoker, reasoning: Invoker, conversational: Invoker) -> Self {
        Self {
            router,
            code,
            reasoning,
            conversational,
        }
    }

    /// Bind all four roles to one provider using the default model profiles.
    pub fn with_defaults(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            router: Invoker::new(Arc::clone(&provider), RoleProfile::router_default()),
            code: Invoker::new(Arc::clone(&provider), RoleProfile::code_default()),
            reasoning: Invoker::new(Arc::clone(&provider), RoleProfile::reasoning_default()),
            conversational: Invoker::new(provider, RoleProfile::conversational_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn invoke_prepends_the_system_instruction() {
        let provider = Arc::new(MockProvider::new("mock"));
        let invoker = Invoker::new(
            Arc::clone(&provider) as Arc<dyn ChatProvider>,
            RoleProfile::new("test/model").with_temperature(0.5),
        );

        let history = vec![ChatMessage::user("hello")];
        invoker.invoke("You are a test.", &history).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "test/model");
        assert_eq!(requests[0].temperature, Some(0.5));
        assert_eq!(requests[0].messages[0], ChatMessage::system("You are a test."));
        assert_eq!(requests[0].messages[1], ChatMessage::user("hello"));
    }

    #[tokio::test]
    async fn invoke_returns_only_the_final_answer() {
        let provider = Arc::new(MockProvider::new("mock"));
        provider.push_reasoning_response("42", "long deliberation trace");
        let invoker = Invoker::new(
            Arc::clone(&provider) as Arc<dyn ChatProvider>,
            RoleProfile::reasoning_default(),
        );

        let text = invoker.invoke("Think hard.", &[ChatMessage::user("q")]).await.unwrap();
        assert_eq!(text, "42");
    }

    #[tokio::test]
    async fn with_defaults_binds_distinct_profiles() {
        let provider: Arc<dyn ChatProvider> = Arc::new(MockProvider::new("mock"));
        let set = InvokerSet::with_defaults(provider);
        assert_ne!(set.router.profile().model, set.code.profile().model);
        assert!(set.reasoning.profile().reasoning_budget.is_some());
    }
}
