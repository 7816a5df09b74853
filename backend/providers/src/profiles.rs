/// Model profile for one specialized role.
///
/// Each role is bound to a distinct latency/quality tradeoff; the reasoning
/// role additionally carries an internal deliberation budget.
#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub reasoning_budget: Option<u32>,
}

/// Model used for the heavier code and reasoning roles.
const COMPLEX_TASK_MODEL: &str = "anthropic/claude-3.7-sonnet";

impl RoleProfile {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
            reasoning_budget: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_reasoning_budget(mut self, budget: u32) -> Self {
        self.reasoning_budget = Some(budget);
        self
    }

    /// Fast, deterministic classifier for routing decisions.
    pub fn router_default() -> Self {
        Self::new("google/gemini-2.0-flash-001").with_temperature(0.0)
    }

    /// Code generation.
    pub fn code_default() -> Self {
        Self::new(COMPLEX_TASK_MODEL).with_temperature(0.7)
    }

    /// Deep reasoning with an extended deliberation budget.
    pub fn reasoning_default() -> Self {
        Self::new(COMPLEX_TASK_MODEL)
            .with_max_tokens(20_000)
            .with_reasoning_budget(16_000)
    }

    /// Plain conversational replies; also used for memory summarization.
    pub fn conversational_default() -> Self {
        Self::new("deepseek/deepseek-chat").with_temperature(0.9)
    }
}
