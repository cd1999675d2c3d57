//! The dispatcher.
//!
//! [`AutomationAgent::execute`] routes one [`Intent`] to exactly one handler.
//! [`AutomationAgent::handle_request`] is the per-request entry point: it
//! classifies, executes, and records the turn in the session.  It is also
//! the one place handler errors are turned into a user-visible reply.

use std::sync::Arc;

use chrono::Local;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use taskpilot_intent::{Classification, Intent, IntentClassifier, TaskKind};
use taskpilot_llm::TextCompletion;
use taskpilot_table::Table;

use crate::error::Result;
use crate::handlers::{finance, hr, presentation, report, sales, sheet};
use crate::output::TaskOutput;
use crate::session::SessionState;

/// The result of one successful turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub intent: Intent,
    /// `false` when the classifier fell back to the default intent.
    pub understood: bool,
    pub output: TaskOutput,
}

/// Classifies requests and runs the matching handler.
pub struct AutomationAgent {
    model: Arc<dyn TextCompletion>,
    classifier: IntentClassifier,
}

impl AutomationAgent {
    pub fn new(model: Arc<dyn TextCompletion>) -> Self {
        let classifier = IntentClassifier::new(Arc::clone(&model));
        Self { model, classifier }
    }

    pub async fn classify(&self, text: &str) -> Classification {
        self.classifier.classify(text).await
    }

    /// Run the handler for `intent`.
    ///
    /// `request` is the user's original text; the `general` kind sends it to
    /// the model unchanged.
    pub async fn execute<R>(
        &self,
        request: &str,
        intent: &Intent,
        uploaded: Option<&Table>,
        rng: &mut R,
    ) -> Result<TaskOutput>
    where
        R: Rng + Send + ?Sized,
    {
        info!(task = %intent.task_kind, action = %intent.action, "dispatching task");
        let now = Local::now();
        match intent.task_kind {
            TaskKind::SheetUpdate => sheet::run(intent, uploaded, &now, rng),
            TaskKind::ReportGeneration => report::run(self.model.as_ref(), intent).await,
            TaskKind::PresentationCreation => {
                presentation::run(self.model.as_ref(), intent).await
            }
            TaskKind::HrWorkflow => Ok(hr::run(intent)),
            TaskKind::SalesTask => sales::run(&now, rng),
            TaskKind::FinanceTask => finance::run(rng),
            TaskKind::General => {
                debug!("no dedicated handler, using a plain completion");
                let text = self.model.complete(request).await?;
                Ok(TaskOutput::Text { text })
            }
        }
    }

    /// Handle one user message against `session`.
    ///
    /// The user message is always recorded.  On success the reply goes into
    /// the transcript and the task into the history; on failure the
    /// transcript gets an `Error: ...` reply, the history is left alone and
    /// the error is returned.
    pub async fn handle_request(
        &self,
        text: &str,
        session: &mut SessionState,
    ) -> Result<TurnOutcome> {
        session.push_user(text);

        let classification = self.classify(text).await;
        let understood = classification.is_understood();
        let intent = classification.into_intent();

        let uploaded = session.uploaded.as_ref().map(|u| &u.table);
        let result = self.execute(text, &intent, uploaded, &mut session.rng).await;

        match result {
            Ok(output) => {
                session.push_assistant(output.render(), output.table().cloned());
                session.push_history(intent.task_kind.as_str(), Local::now());
                Ok(TurnOutcome {
                    intent,
                    understood,
                    output,
                })
            }
            Err(e) => {
                warn!(task = %intent.task_kind, error = %e, "task failed");
                session.push_assistant(format!("Error: {e}"), None);
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
