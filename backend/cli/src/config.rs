/// Relay runtime configuration.
///
/// The endpoint and credential are optional here; a missing credential only
/// surfaces when the first completion is attempted, never at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completions base URL.
    pub base_url: String,
    /// API credential for the completion endpoint.
    pub api_key: Option<String>,
    /// Log level when RUST_LOG is unset.
    pub log_level: String,
}

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    /// `BASE_URL` and `OPENAI_API_KEY` are honored as aliases for setups
    /// that already use OpenAI-style variable names.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("RELAY_BASE_URL")
                .or_else(|_| std::env::var("BASE_URL"))
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("OPENROUTER_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
