//! Task dispatch and session state for TaskPilot.
//!
//! ## Architecture
//!
//! ```text
//! user text ──> IntentClassifier ──> AutomationAgent::execute ──> handler
//!                                          │                        │
//!                                    SessionState <── TaskOutput ───┘
//!                              (transcript, history, table, rng)
//! ```
//!
//! ## Modules
//!
//! - [`agent`] -- The dispatcher and the per-request entry point.
//! - [`handlers`] -- The six task handlers.
//! - [`output`] -- What a handler hands back for display.
//! - [`session`] -- Per-session state.
//! - [`error`] -- Agent error types.

pub mod agent;
pub mod error;
pub mod handlers;
pub mod output;
pub mod session;

pub use agent::{AutomationAgent, TurnOutcome};
pub use error::{AgentError, Result};
pub use output::TaskOutput;
pub use session::{ChatMessage, ChatRole, SessionState, TaskHistoryEntry, UploadedTable};
