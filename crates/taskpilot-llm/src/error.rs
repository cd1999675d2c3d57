//! LLM error types.
//!
//! All completion calls surface errors through [`LlmError`].  The assistant
//! deliberately does not distinguish transient from permanent failures; the
//! variants exist so logs say what actually went wrong.

/// Unified error type for the completion layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// An HTTP request to the LLM provider failed or returned a non-2xx status.
    #[error("llm request failed: {reason}")]
    RequestFailed { reason: String },

    /// The provider response could not be parsed into text.
    #[error("llm response parse error: {reason}")]
    ParseFailed { reason: String },

    /// The API key is missing for the configured provider.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    /// The provider name in configuration is not one we know.
    #[error("unknown llm provider: {name}")]
    UnknownProvider { name: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the completion crate.
pub type Result<T> = std::result::Result<T, LlmError>;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}
