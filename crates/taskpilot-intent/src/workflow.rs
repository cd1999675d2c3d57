//! Workflow definitions: user-authored, named step lists.
//!
//! Definitions are saved for the session and listed back; nothing executes
//! them.  The trigger and category are descriptive labels.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IntentError, Result};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// When a workflow is meant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowTrigger {
    /// Started by hand.
    #[default]
    Manual,
    Daily,
    Weekly,
    Monthly,
    /// Whenever a spreadsheet is uploaded.
    OnFileUpload,
}

impl fmt::Display for WorkflowTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manual => "manual",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OnFileUpload => "on file upload",
        })
    }
}

/// The business area a workflow belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowCategory {
    Hr,
    Sales,
    Finance,
    Reporting,
    Sheets,
}

impl fmt::Display for WorkflowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hr => "HR",
            Self::Sales => "Sales",
            Self::Finance => "Finance",
            Self::Reporting => "Reporting",
            Self::Sheets => "Sheets",
        })
    }
}

/// A saved workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// When the workflow is meant to run.
    pub trigger: WorkflowTrigger,
    /// Business area.
    pub category: WorkflowCategory,
    /// Ordered step descriptions.
    pub steps: Vec<String>,
    /// Creation time (local).
    pub created_at: DateTime<Local>,
}

impl WorkflowDefinition {
    /// Create a definition.
    ///
    /// Names and steps are trimmed and blank steps dropped.  An empty name
    /// or an empty step list is rejected.
    pub fn new<I, S>(
        name: &str,
        trigger: WorkflowTrigger,
        category: WorkflowCategory,
        steps: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(IntentError::InvalidWorkflow {
                reason: "workflow name is empty".into(),
            });
        }

        let steps: Vec<String> = steps
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        if steps.is_empty() {
            return Err(IntentError::InvalidWorkflow {
                reason: format!("workflow `{name}` has no steps"),
            });
        }

        Ok(Self {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            trigger,
            category,
            steps,
            created_at: Local::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_and_drops_blank_steps() {
        let wf = WorkflowDefinition::new(
            "  Month-end close ",
            WorkflowTrigger::Monthly,
            WorkflowCategory::Finance,
            ["Reconcile accounts", "   ", " Send summary "],
        )
        .unwrap();
        assert_eq!(wf.name, "Month-end close");
        assert_eq!(wf.steps, vec!["Reconcile accounts", "Send summary"]);
        assert_eq!(wf.trigger, WorkflowTrigger::Monthly);
    }

    #[test]
    fn empty_name_rejected() {
        let result = WorkflowDefinition::new(
            "  ",
            WorkflowTrigger::Manual,
            WorkflowCategory::Hr,
            ["step"],
        );
        assert!(matches!(result, Err(IntentError::InvalidWorkflow { .. })));
    }

    #[test]
    fn no_steps_rejected() {
        let steps: Vec<String> = vec!["".into(), " ".into()];
        let result = WorkflowDefinition::new(
            "Weekly sync",
            WorkflowTrigger::Weekly,
            WorkflowCategory::Reporting,
            steps,
        );
        assert!(result.is_err());
    }

    #[test]
    fn serde_labels() {
        let json = serde_json::to_value(WorkflowTrigger::OnFileUpload).unwrap();
        assert_eq!(json, "on_file_upload");
        let category: WorkflowCategory = serde_json::from_str("\"hr\"").unwrap();
        assert_eq!(category, WorkflowCategory::Hr);
        assert_eq!(WorkflowTrigger::default(), WorkflowTrigger::Manual);
    }
}
