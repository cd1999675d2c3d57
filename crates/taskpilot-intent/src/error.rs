//! Intent crate error types.

/// Unified error type for classification and workflow definitions.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    // -- Classifier errors ---------------------------------------------------
    /// The model output could not be turned into a structured intent.
    #[error("failed to parse intent: {reason}")]
    ParseFailed { reason: String },

    // -- Workflow errors -----------------------------------------------------
    /// A workflow definition was rejected at creation.
    #[error("invalid workflow: {reason}")]
    InvalidWorkflow { reason: String },

    // -- Upstream crate errors -----------------------------------------------
    /// An error propagated from the completion layer.
    #[error("llm error: {0}")]
    Llm(#[from] taskpilot_llm::LlmError),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
