//! Handler results as shown to the user.

use serde::Serialize;
use taskpilot_table::Table;

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutput {
    /// Model-written prose, passed through verbatim.
    Text { text: String },
    /// A table plus a one-line summary.
    Table { table: Table, summary: String },
    /// An ordered checklist.
    Checklist { steps: Vec<String> },
}

impl TaskOutput {
    /// The text that goes into the chat transcript.
    pub fn render(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Table { summary, .. } => summary.clone(),
            Self::Checklist { steps } => steps
                .iter()
                .map(|s| format!("✔ {s}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Self::Table { table, .. } => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_renders_with_ticks() {
        let out = TaskOutput::Checklist {
            steps: vec!["One".into(), "Two".into()],
        };
        assert_eq!(out.render(), "✔ One\n✔ Two");
        assert!(out.table().is_none());
    }

    #[test]
    fn table_renders_summary() {
        let out = TaskOutput::Table {
            table: Table::new(["A"]),
            summary: "Generated Finance Report".into(),
        };
        assert_eq!(out.render(), "Generated Finance Report");
        assert!(out.table().is_some());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let out = TaskOutput::Text { text: "hi".into() };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["text"], "hi");
    }
}
