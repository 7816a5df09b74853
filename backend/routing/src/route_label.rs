use serde::{Deserialize, Serialize};

/// Which specialized responder handles a turn.
///
/// Decoded from the router model's raw output. That output is untrusted
/// free text, not a validated enum, so decoding is total: anything that is
/// not exactly one of the recognized labels resolves to `Conversational`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteLabel {
    #[serde(rename = "code_agent")]
    Code,
    #[serde(rename = "thinking_agent")]
    Reasoning,
    #[serde(rename = "simple_agent")]
    Conversational,
}

impl RouteLabel {
    /// Decode a raw router label.
    ///
    /// Matching is case-sensitive and exact; unrecognized values (including
    /// `"simple_agent"` itself) fall back to the conversational responder.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "code_agent" => RouteLabel::Code,
            "thinking_agent" => RouteLabel::Reasoning,
            _ => RouteLabel::Conversational,
        }
    }

    /// The wire label, for logging and persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteLabel::Code => "code_agent",
            RouteLabel::Reasoning => "thinking_agent",
            RouteLabel::Conversational => "simple_agent",
        }
    }
}

impl std::fmt::Display for RouteLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
