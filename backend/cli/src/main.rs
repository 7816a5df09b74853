mod config;
mod session;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use relay_agent::TurnPipeline;
use relay_core::{ChatProvider, SessionIdentity};
use relay_memory::{InMemoryStore, MemoryStore};
use relay_providers::{InvokerSet, OpenRouterProvider};

use config::Config;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay — a conversational router over specialized LLM agents")]
#[command(version)]
struct Cli {
    /// Override the chat-completions base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let base_url = cli.base_url.unwrap_or(config.base_url);

    let mut provider = OpenRouterProvider::new().with_base_url(base_url);
    if let Some(api_key) = config.api_key {
        provider = provider.with_api_key(api_key);
    }
    let provider: Arc<dyn ChatProvider> = Arc::new(provider);

    let invokers = InvokerSet::with_defaults(provider);
    let store: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());

    // One conversation and one user per process run.
    let session = SessionIdentity::generate();
    info!(session = %session, "starting session");

    let pipeline = TurnPipeline::new(invokers, store, session);
    session::run(pipeline).await
}
