use std::sync::Arc;

use tracing::{debug, info};

use relay_core::{ChatMessage, RelayError, SessionIdentity};
use relay_memory::MemoryStore;
use relay_providers::InvokerSet;
use relay_routing::RouteLabel;

use crate::prompts;
use crate::state::{TurnOutcome, TurnState};

/// The per-turn state machine:
///
/// `Start → Routing → {code | reasoning | conversational} responder`
///
/// with the memory writer fanning out from Routing alongside the responder.
/// The two branches have no data dependency on each other; both must finish
/// before the turn reports done, and only the responder's text is the
/// turn's output.
pub struct TurnPipeline {
    invokers: InvokerSet,
    store: Arc<dyn MemoryStore>,
    session: SessionIdentity,
}

impl TurnPipeline {
    pub fn new(invokers: InvokerSet, store: Arc<dyn MemoryStore>, session: SessionIdentity) -> Self {
        Self {
            invokers,
            store,
            session,
        }
    }

    pub fn session(&self) -> &SessionIdentity {
        &self.session
    }

    /// Run one turn over the full message history.
    ///
    /// No stage retries; the first invoker failure aborts the whole turn.
    pub async fn run_turn(&self, messages: Vec<ChatMessage>) -> Result<TurnOutcome, RelayError> {
        let mut state = TurnState::new(messages)?;

        let raw_label = self
            .invokers
            .router
            .invoke(prompts::ROUTER_INSTRUCTIONS, state.messages())
            .await?;
        let label = RouteLabel::parse(&raw_label);
        state.agent = Some(label);
        info!(label = label.as_str(), raw = %raw_label, "route selected");

        let user_id = self.session.user_key();
        let (response, ()) = tokio::try_join!(
            self.respond(label, state.messages(), &user_id),
            self.update_memory(state.messages(), &user_id),
        )?;

        state.response = Some(response);
        state.into_outcome()
    }

    /// The specialized responder branch: read memory, personalize the role
    /// instruction, invoke the dispatched role.
    async fn respond(
        &self,
        label: RouteLabel,
        messages: &[ChatMessage],
        user_id: &str,
    ) -> Result<String, RelayError> {
        let memory = self.store.recall(user_id).await;
        debug!(label = label.as_str(), "responder started");
        let (invoker, instruction) = match label {
            RouteLabel::Code => (&self.invokers.code, prompts::code_instructions(&memory)),
            RouteLabel::Reasoning => (
                &self.invokers.reasoning,
                prompts::reasoning_instructions(&memory),
            ),
            RouteLabel::Conversational => (
                &self.invokers.conversational,
                prompts::conversational_instructions(&memory),
            ),
        };
        invoker.invoke(&instruction, messages).await
    }

    /// The memory-writer branch: read-merge-write of the user's blob, held
    /// under the per-user lock so concurrent turns for one user cannot lose
    /// updates. The store is only written after the invocation succeeds.
    async fn update_memory(&self, messages: &[ChatMessage], user_id: &str) -> Result<(), RelayError> {
        let _guard = self.store.lock_user(user_id).await;
        let memory = self.store.recall(user_id).await;
        let instruction = prompts::memory_update_instructions(&memory);
        let updated = self
            .invokers
            .conversational
            .invoke(&instruction, messages)
            .await?;
        self.store.put(user_id, updated).await;
        debug!(user_id, "memory updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::ChatProvider;
    use relay_memory::InMemoryStore;
    use relay_providers::{Invoker, MockProvider, RoleProfile};

    struct Harness {
        router: Arc<MockProvider>,
        code: Arc<MockProvider>,
        reasoning: Arc<MockProvider>,
        conversational: Arc<MockProvider>,
        store: Arc<InMemoryStore>,
        pipeline: TurnPipeline,
        user_id: String,
    }

    fn harness() -> Harness {
        let router = Arc::new(MockProvider::new("router"));
        let code = Arc::new(MockProvider::new("code"));
        let reasoning = Arc::new(MockProvider::new("reasoning"));
        let conversational = Arc::new(MockProvider::new("conversational"));

        let invokers = InvokerSet::new(
            Invoker::new(
                Arc::clone(&router) as Arc<dyn ChatProvider>,
                RoleProfile::new("router/model"),
            ),
            Invoker::new(
                Arc::clone(&code) as Arc<dyn ChatProvider>,
                RoleProfile::new("code/model"),
            ),
            Invoker::new(
                Arc::clone(&reasoning) as Arc<dyn ChatProvider>,
                RoleProfile::new("reasoning/model"),
            ),
            Invoker::new(
                Arc::clone(&conversational) as Arc<dyn ChatProvider>,
                RoleProfile::new("conversational/model"),
            ),
        );

        let store = Arc::new(InMemoryStore::new());
        let session = SessionIdentity::generate();
        let user_id = session.user_key();
        let pipeline = TurnPipeline::new(
            invokers,
            Arc::clone(&store) as Arc<dyn MemoryStore>,
            session,
        );

        Harness {
            router,
            code,
            reasoning,
            conversational,
            store,
            pipeline,
            user_id,
        }
    }

    fn turn(text: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::user(text)]
    }

    #[tokio::test]
    async fn code_label_dispatches_to_the_code_responder() {
        let h = harness();
        h.router.push_response("code_agent");
        h.code.push_response("fn main() {}");
        h.conversational.push_response("- user writes rust");

        let outcome = h.pipeline.run_turn(turn("write me a program")).await.unwrap();

        assert_eq!(outcome.agent, RouteLabel::Code);
        assert_eq!(outcome.response, "fn main() {}");
        // Response comes only from the responder, never the memory writer.
        assert_eq!(
            h.store.get(&h.user_id).await.as_deref(),
            Some("- user writes rust")
        );
        assert!(h.reasoning.requests().is_empty());
    }

    #[tokio::test]
    async fn thinking_label_dispatches_to_the_reasoning_responder() {
        let h = harness();
        h.router.push_response("thinking_agent");
        h.reasoning
            .push_reasoning_response("the answer is 42", "step 1... step 2...");

        let outcome = h.pipeline.run_turn(turn("hard question")).await.unwrap();

        assert_eq!(outcome.agent, RouteLabel::Reasoning);
        // Only the final answer, never the deliberation trace.
        assert_eq!(outcome.response, "the answer is 42");
        assert!(h.code.requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_label_falls_back_to_the_conversational_responder() {
        for raw in ["simple_agent", "", "banana", "CODE_AGENT"] {
            let h = harness();
            h.router.push_response(raw);
            // The conversational role serves both the responder and the
            // memory writer on this route; the shared fallback keeps the
            // script order-independent.
            let outcome = h.pipeline.run_turn(turn("hello")).await.unwrap();
            assert_eq!(outcome.agent, RouteLabel::Conversational, "raw = {raw:?}");
            assert_eq!(outcome.response, "Mock response");
            assert!(h.code.requests().is_empty());
            assert!(h.reasoning.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn router_receives_the_fixed_instruction_and_full_history() {
        let h = harness();
        h.router.push_response("code_agent");

        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];
        h.pipeline.run_turn(history.clone()).await.unwrap();

        let seen = h.router.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].messages[0],
            ChatMessage::system(prompts::ROUTER_INSTRUCTIONS)
        );
        assert_eq!(&seen[0].messages[1..], history.as_slice());
    }

    #[tokio::test]
    async fn responder_instruction_embeds_the_stored_memory() {
        let h = harness();
        h.store.put(&h.user_id, "- name: Ana".to_string()).await;
        h.router.push_response("code_agent");

        h.pipeline.run_turn(turn("hi")).await.unwrap();

        let seen = h.code.requests();
        assert!(seen[0].messages[0].content.contains("- name: Ana"));
    }

    #[tokio::test]
    async fn memory_writer_merges_over_the_prior_blob() {
        let h = harness();
        h.store.put(&h.user_id, "- name: Ana".to_string()).await;
        h.router.push_response("code_agent");
        h.conversational
            .push_response("- name: Ana\n- plays chess");

        h.pipeline.run_turn(turn("i play chess")).await.unwrap();

        // The writer saw the prior blob and fully replaced it.
        let seen = h.conversational.requests();
        assert!(seen[0].messages[0].content.contains("- name: Ana"));
        assert_eq!(
            h.store.get(&h.user_id).await.as_deref(),
            Some("- name: Ana\n- plays chess")
        );
    }

    #[tokio::test]
    async fn second_turn_reads_the_blob_written_by_the_first() {
        let h = harness();

        h.router.push_response("code_agent");
        h.conversational.push_response("- fact one");
        h.pipeline.run_turn(turn("turn one")).await.unwrap();

        h.router.push_response("code_agent");
        h.conversational.push_response("- fact one\n- fact two");
        h.pipeline.run_turn(turn("turn two")).await.unwrap();

        let seen = h.conversational.requests();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].messages[0].content.contains("- fact one"));
        assert_eq!(
            h.store.get(&h.user_id).await.as_deref(),
            Some("- fact one\n- fact two")
        );
    }

    #[tokio::test]
    async fn responder_failure_aborts_the_turn_with_a_typed_error() {
        let h = harness();
        h.router.push_response("code_agent");
        h.code.push_error(RelayError::Provider {
            provider: "mock".into(),
            message: "timeout".into(),
        });

        let err = h.pipeline.run_turn(turn("hi")).await.unwrap_err();
        assert!(matches!(err, RelayError::Provider { .. }));
    }

    #[tokio::test]
    async fn memory_writer_failure_leaves_no_partial_write() {
        let h = harness();
        h.router.push_response("code_agent");
        h.code.push_response("fine");
        h.conversational.push_error(RelayError::Provider {
            provider: "mock".into(),
            message: "boom".into(),
        });

        let err = h.pipeline.run_turn(turn("hi")).await.unwrap_err();
        assert!(matches!(err, RelayError::Provider { .. }));
        assert_eq!(h.store.get(&h.user_id).await, None);
    }

    #[tokio::test]
    async fn empty_history_is_rejected_before_any_invocation() {
        let h = harness();
        let err = h.pipeline.run_turn(Vec::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::EmptyTurn));
        assert!(h.router.requests().is_empty());
    }
}
