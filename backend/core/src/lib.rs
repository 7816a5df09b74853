pub mod chat;
pub mod error;
pub mod identity;
pub mod provider;

pub use chat::{ChatMessage, Role};
pub use error::RelayError;
pub use identity::SessionIdentity;
pub use provider::{ChatProvider, CompletionRequest, CompletionResponse};
