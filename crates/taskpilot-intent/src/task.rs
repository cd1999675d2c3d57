//! The fixed set of supported task kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An automation category.  `General` covers anything the classifier could
/// not place, and is served by a plain completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    SheetUpdate,
    ReportGeneration,
    PresentationCreation,
    HrWorkflow,
    SalesTask,
    FinanceTask,
    General,
}

impl TaskKind {
    /// The kinds the classifier prompt offers to the model.
    pub const ACTIONABLE: [TaskKind; 6] = [
        Self::SheetUpdate,
        Self::ReportGeneration,
        Self::PresentationCreation,
        Self::HrWorkflow,
        Self::SalesTask,
        Self::FinanceTask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SheetUpdate => "sheet_update",
            Self::ReportGeneration => "report_generation",
            Self::PresentationCreation => "presentation_creation",
            Self::HrWorkflow => "hr_workflow",
            Self::SalesTask => "sales_task",
            Self::FinanceTask => "finance_task",
            Self::General => "general",
        }
    }

    /// Map a model-supplied name onto a kind.  Unrecognized names become
    /// [`TaskKind::General`].
    pub fn from_name(name: &str) -> Self {
        Self::ACTIONABLE
            .into_iter()
            .find(|k| k.as_str() == name.trim())
            .unwrap_or(Self::General)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in TaskKind::ACTIONABLE {
            assert_eq!(TaskKind::from_name(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_names_are_general() {
        assert_eq!(TaskKind::from_name("email_task"), TaskKind::General);
        assert_eq!(TaskKind::from_name(""), TaskKind::General);
        assert_eq!(TaskKind::from_name("general"), TaskKind::General);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskKind::HrWorkflow).unwrap();
        assert_eq!(json, "\"hr_workflow\"");
    }
}
