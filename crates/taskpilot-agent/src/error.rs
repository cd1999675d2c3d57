//! Agent error types.
//!
//! Anything a handler raises ends up here and is shown to the user once by
//! [`crate::AutomationAgent::handle_request`].

/// Unified error type for task dispatch and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A handler parameter is outside what the handler accepts.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    // -- Upstream crate errors -----------------------------------------------
    /// A completion call failed.
    #[error("llm error: {0}")]
    Llm(#[from] taskpilot_llm::LlmError),

    /// Building, reading, or exporting a table failed.
    #[error(transparent)]
    Table(#[from] taskpilot_table::TableError),

    /// An intent-layer error (e.g. an invalid workflow definition).
    #[error(transparent)]
    Intent(#[from] taskpilot_intent::IntentError),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;
