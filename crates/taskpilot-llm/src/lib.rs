//! Text-completion boundary for TaskPilot.
//!
//! Everything the assistant asks of a language model goes through the
//! [`TextCompletion`] trait: one prompt in, one text blob out.  The concrete
//! [`LlmClient`] talks HTTP to Gemini, Anthropic, or any OpenAI-compatible
//! endpoint; tests substitute a deterministic stub.
//!
//! ## Modules
//!
//! - [`completion`] -- The `TextCompletion` trait.
//! - [`client`] -- HTTP client and provider wire formats.
//! - [`types`] -- Provider-agnostic request and message types.
//! - [`error`] -- LLM error types.

pub mod client;
pub mod completion;
pub mod error;
pub mod types;

pub use client::{LlmClient, LlmClientConfig, LlmProvider};
pub use completion::TextCompletion;
pub use error::{LlmError, Result};
pub use types::{ChatRequest, Message, Role};
