use thiserror::Error;

/// Top-level error type for the Relay runtime.
///
/// An unrecognized router label is deliberately NOT an error: the route
/// decoder is total and falls back to the conversational responder.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required external-service settings are missing. Raised on the first
    /// invocation attempt, never at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The text-completion collaborator failed (transport, auth, HTTP error).
    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// The provider answered but its payload did not have the expected shape.
    #[error("malformed provider response ({provider}): {reason}")]
    MalformedResponse { provider: String, reason: String },

    /// A turn was constructed with no messages to act on.
    #[error("turn contains no messages")]
    EmptyTurn,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
