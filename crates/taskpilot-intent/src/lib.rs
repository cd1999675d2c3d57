//! Intent classification and workflow definitions for TaskPilot.
//!
//! This crate provides:
//!
//! - **Task kinds**: the fixed set of automation categories, via
//!   [`task::TaskKind`].
//! - **Intent classification**: one completion call turning free text into
//!   an [`Intent`], with an explicit fallback outcome, via
//!   [`classifier::IntentClassifier`].
//! - **Workflow definitions**: user-authored step lists with a trigger and
//!   category, via [`workflow::WorkflowDefinition`].

pub mod classifier;
pub mod error;
pub mod task;
pub mod workflow;

pub use classifier::{Classification, Intent, IntentClassifier, parse_intent_response};
pub use error::{IntentError, Result};
pub use task::TaskKind;
pub use workflow::{WorkflowCategory, WorkflowDefinition, WorkflowTrigger};
