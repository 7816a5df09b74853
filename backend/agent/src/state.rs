use serde::Serialize;

use relay_core::{ChatMessage, RelayError};
use relay_routing::RouteLabel;

/// Per-turn pipeline state: the conversation so far, the route the router
/// picked, and the responder's text. Created fresh for every turn and
/// discarded once the response is delivered.
#[derive(Debug, Clone)]
pub struct TurnState {
    messages: Vec<ChatMessage>,
    pub agent: Option<RouteLabel>,
    pub response: Option<String>,
}

impl TurnState {
    /// Construction rejects an empty history; every later stage assumes
    /// there is at least one message to act on.
    pub fn new(messages: Vec<ChatMessage>) -> Result<Self, RelayError> {
        if messages.is_empty() {
            return Err(RelayError::EmptyTurn);
        }
        Ok(Self {
            messages,
            agent: None,
            response: None,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Consume the turn into its externally observable outcome. Both the
    /// route and the responder's text must have been recorded.
    pub fn into_outcome(self) -> Result<TurnOutcome, RelayError> {
        let (Some(agent), Some(response)) = (self.agent, self.response) else {
            return Err(RelayError::Other(anyhow::anyhow!(
                "turn state consumed before routing and response completed"
            )));
        };
        Ok(TurnOutcome { agent, response })
    }
}

/// The externally observable result of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub agent: RouteLabel,
    pub response: String,
}
