//! Per-session state.
//!
//! One [`SessionState`] exists per browser session.  It owns the chat
//! transcript, the task history, saved workflow definitions, the current
//! uploaded table, an optional per-session API key and the random source
//! the table synthesizers draw from.  Nothing here is persisted.

use chrono::{DateTime, Local};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use taskpilot_intent::{WorkflowCategory, WorkflowDefinition, WorkflowTrigger};
use taskpilot_table::{Table, read_table};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry.  Never modified after it is appended.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Table shown under the message, if the task produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    pub created_at: DateTime<Local>,
}

/// A completed task, as listed in the "recent tasks" panel.
#[derive(Debug, Clone, Serialize)]
pub struct TaskHistoryEntry {
    pub name: String,
    pub timestamp: DateTime<Local>,
}

impl TaskHistoryEntry {
    /// The time of day, `HH:MM`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// The table currently loaded into the session.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedTable {
    pub filename: String,
    pub table: Table,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything one session remembers.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) workflows: Vec<WorkflowDefinition>,
    pub(crate) task_history: Vec<TaskHistoryEntry>,
    pub(crate) uploaded: Option<UploadedTable>,
    pub(crate) api_key: Option<String>,
    pub(crate) rng: ChaCha8Rng,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A fresh session seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// A fresh session with a fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            messages: Vec::new(),
            workflows: Vec::new(),
            task_history: Vec::new(),
            uploaded: None,
            api_key: None,
            rng,
        }
    }

    // -- Transcript ---------------------------------------------------------

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push_message(ChatRole::User, text.into(), None);
    }

    pub fn push_assistant(&mut self, text: impl Into<String>, table: Option<Table>) {
        self.push_message(ChatRole::Assistant, text.into(), table);
    }

    fn push_message(&mut self, role: ChatRole, text: String, table: Option<Table>) {
        self.messages.push(ChatMessage {
            role,
            text,
            table,
            created_at: Local::now(),
        });
    }

    // -- Task history -------------------------------------------------------

    pub fn push_history(&mut self, name: impl Into<String>, timestamp: DateTime<Local>) {
        self.task_history.push(TaskHistoryEntry {
            name: name.into(),
            timestamp,
        });
    }

    pub fn task_history(&self) -> &[TaskHistoryEntry] {
        &self.task_history
    }

    /// The last `n` history entries, oldest first.
    pub fn recent_tasks(&self, n: usize) -> &[TaskHistoryEntry] {
        let start = self.task_history.len().saturating_sub(n);
        &self.task_history[start..]
    }

    // -- Uploaded table -----------------------------------------------------

    pub fn uploaded(&self) -> Option<&UploadedTable> {
        self.uploaded.as_ref()
    }

    /// Parse `bytes` and make the result the session's table.
    ///
    /// On error the previous table (if any) stays loaded.
    pub fn load_upload(&mut self, filename: &str, bytes: &[u8]) -> Result<&UploadedTable> {
        let table = read_table(filename, bytes)?;
        info!(
            filename,
            rows = table.row_count(),
            columns = table.column_count(),
            "table uploaded"
        );
        Ok(self.uploaded.insert(UploadedTable {
            filename: filename.to_owned(),
            table,
        }))
    }

    /// Drop the loaded table.  Returns whether one was loaded.
    pub fn clear_upload(&mut self) -> bool {
        self.uploaded.take().is_some()
    }

    // -- Workflows ----------------------------------------------------------

    pub fn workflows(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    /// Validate and save a workflow definition.
    pub fn add_workflow<I, S>(
        &mut self,
        name: &str,
        trigger: WorkflowTrigger,
        category: WorkflowCategory,
        steps: I,
    ) -> Result<&WorkflowDefinition>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let workflow = WorkflowDefinition::new(name, trigger, category, steps)?;
        info!(name = %workflow.name, %trigger, %category, "workflow saved");
        self.workflows.push(workflow);
        Ok(&self.workflows[self.workflows.len() - 1])
    }

    // -- Credentials --------------------------------------------------------

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Store a per-session API key.  Blank keys clear it.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.api_key = (!key.is_empty()).then(|| key.to_owned());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
