//! Intent classifier. Turns raw user text into a structured [`Intent`].
//!
//! One completion call per request.  The model is asked for a JSON object;
//! anything that does not parse into the expected shape produces a
//! [`Classification::Fallback`] carrying the default `general` intent, so
//! callers can tell "understood" from "guessed".

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use taskpilot_llm::TextCompletion;

use crate::error::{IntentError, Result};
use crate::task::TaskKind;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A structured interpretation of one user request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Which handler serves the request.
    pub task_kind: TaskKind,
    /// The specific action the model extracted.
    pub action: String,
    /// Handler parameters (e.g. `{"workflow": "offboarding"}`).
    pub parameters: Map<String, Value>,
    /// A short description of what will be done.
    pub description: String,
}

impl Intent {
    /// The intent used whenever classification fails.
    pub fn fallback(text: &str) -> Self {
        Self {
            task_kind: TaskKind::General,
            action: "process".into(),
            parameters: Map::new(),
            description: text.to_owned(),
        }
    }

    /// A string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key)?.as_str()
    }

    /// A non-negative integer parameter.  Numeric strings are accepted since
    /// models often quote numbers.
    pub fn param_u64(&self, key: &str) -> Option<u64> {
        match self.parameters.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// A list-of-strings parameter.  Non-string entries are skipped.
    pub fn param_str_list(&self, key: &str) -> Option<Vec<String>> {
        let items = self.parameters.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        )
    }
}

/// The outcome of classifying one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The model returned a well-formed intent.
    Understood(Intent),
    /// Classification failed; `intent` is [`Intent::fallback`] of the input.
    Fallback { intent: Intent, reason: String },
}

impl Classification {
    pub fn intent(&self) -> &Intent {
        match self {
            Self::Understood(intent) | Self::Fallback { intent, .. } => intent,
        }
    }

    pub fn into_intent(self) -> Intent {
        match self {
            Self::Understood(intent) | Self::Fallback { intent, .. } => intent,
        }
    }

    pub fn is_understood(&self) -> bool {
        matches!(self, Self::Understood(_))
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

fn classification_prompt(text: &str) -> String {
    let kinds = TaskKind::ACTIONABLE
        .iter()
        .map(TaskKind::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze this automation request and extract structured information.\n\
         Request: \"{text}\"\n\
         \n\
         Return a JSON object with:\n\
         - task_type: one of [{kinds}]\n\
         - action: specific action to perform\n\
         - parameters: dict of relevant parameters\n\
         - description: brief description of what will be done\n"
    )
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifies free text through a [`TextCompletion`] model.
pub struct IntentClassifier {
    model: Arc<dyn TextCompletion>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn TextCompletion>) -> Self {
        Self { model }
    }

    /// Classify `text`.  Never fails: completion errors and malformed output
    /// both produce [`Classification::Fallback`].
    pub async fn classify(&self, text: &str) -> Classification {
        debug!(text, "classifying request");

        let result = match self.model.complete(&classification_prompt(text)).await {
            Ok(raw) => parse_intent_response(&raw),
            Err(e) => Err(IntentError::from(e)),
        };

        match result {
            Ok(intent) => {
                info!(
                    task = %intent.task_kind,
                    action = %intent.action,
                    "request classified"
                );
                Classification::Understood(intent)
            }
            Err(e) => {
                warn!(error = %e, "classification failed, falling back to general");
                Classification::Fallback {
                    intent: Intent::fallback(text),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Parse raw model output into an [`Intent`].
///
/// Every ```` ```json ```` and ```` ``` ```` marker is removed before
/// parsing.  All four fields must be present; `parameters` must be an
/// object.  An unrecognized `task_type` maps to [`TaskKind::General`].
pub fn parse_intent_response(raw: &str) -> Result<Intent> {
    let cleaned = raw.trim().replace("```json", "").replace("```", "");

    let parsed: Value = serde_json::from_str(cleaned.trim()).map_err(|e| {
        IntentError::ParseFailed {
            reason: format!("model output is not JSON: {e}"),
        }
    })?;

    let obj = parsed.as_object().ok_or_else(|| IntentError::ParseFailed {
        reason: "model output is not a JSON object".into(),
    })?;

    let task_type = str_field(obj, "task_type")?;
    let action = str_field(obj, "action")?.to_owned();
    let description = str_field(obj, "description")?.to_owned();
    let parameters = obj
        .get("parameters")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| IntentError::ParseFailed {
            reason: "missing object field `parameters`".into(),
        })?;

    Ok(Intent {
        task_kind: TaskKind::from_name(task_type),
        action,
        parameters,
        description,
    })
}

fn str_field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    obj.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| IntentError::ParseFailed {
            reason: format!("missing string field `{name}`"),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use taskpilot_llm::LlmError;

    use super::*;

    /// Returns a fixed response, or fails when `None`.
    struct Canned(Option<&'static str>);

    #[async_trait]
    impl TextCompletion for Canned {
        async fn complete(&self, _prompt: &str) -> taskpilot_llm::Result<String> {
            self.0.map(str::to_owned).ok_or(LlmError::RequestFailed {
                reason: "connection reset".into(),
            })
        }
    }

    fn classifier(response: Option<&'static str>) -> IntentClassifier {
        IntentClassifier::new(Arc::new(Canned(response)))
    }

    #[test]
    fn prompt_embeds_request_and_kinds() {
        let prompt = classification_prompt("make a deck");
        assert!(prompt.contains("Request: \"make a deck\""));
        for kind in TaskKind::ACTIONABLE {
            assert!(prompt.contains(kind.as_str()));
        }
        assert!(!prompt.contains("general"));
    }

    #[test]
    fn parse_plain_json() {
        let raw = r#"{"task_type": "hr_workflow", "action": "start", "parameters": {"workflow": "offboarding"}, "description": "Offboard"}"#;
        let intent = parse_intent_response(raw).unwrap();
        assert_eq!(intent.task_kind, TaskKind::HrWorkflow);
        assert_eq!(intent.param_str("workflow"), Some("offboarding"));
        assert_eq!(intent.description, "Offboard");
    }

    #[test]
    fn parse_fenced_json() {
        let raw = "```json\n{\"task_type\": \"sales_task\", \"action\": \"a\", \"parameters\": {}, \"description\": \"d\"}\n```";
        let intent = parse_intent_response(raw).unwrap();
        assert_eq!(intent.task_kind, TaskKind::SalesTask);
    }

    #[test]
    fn parse_unknown_task_type_is_general() {
        let raw = r#"{"task_type": "email_task", "action": "a", "parameters": {}, "description": "d"}"#;
        assert_eq!(parse_intent_response(raw).unwrap().task_kind, TaskKind::General);
    }

    #[test]
    fn parse_rejects_missing_fields() {
        let raw = r#"{"task_type": "sales_task", "action": "a"}"#;
        assert!(parse_intent_response(raw).is_err());
        let raw = r#"{"task_type": "sales_task", "action": "a", "parameters": [], "description": "d"}"#;
        assert!(parse_intent_response(raw).is_err());
        assert!(parse_intent_response("[1, 2]").is_err());
    }

    #[test]
    fn numeric_params_accept_strings() {
        let raw = r#"{"task_type": "sheet_update", "action": "a", "parameters": {"rows": "12", "slides": 5, "columns": ["A", 3, "B"]}, "description": "d"}"#;
        let intent = parse_intent_response(raw).unwrap();
        assert_eq!(intent.param_u64("rows"), Some(12));
        assert_eq!(intent.param_u64("slides"), Some(5));
        assert_eq!(intent.param_u64("missing"), None);
        assert_eq!(
            intent.param_str_list("columns"),
            Some(vec!["A".to_owned(), "B".to_owned()])
        );
    }

    #[tokio::test]
    async fn malformed_output_falls_back() {
        for raw in ["not json at all", "", "{\"task_type\": 3}", "```json\n{oops\n```"] {
            let outcome = classifier(Some(raw)).classify("generate a weekly report").await;
            assert!(!outcome.is_understood(), "{raw:?} should fall back");
            let intent = outcome.into_intent();
            assert_eq!(intent, Intent::fallback("generate a weekly report"));
            assert_eq!(intent.task_kind, TaskKind::General);
            assert_eq!(intent.action, "process");
            assert!(intent.parameters.is_empty());
            assert_eq!(intent.description, "generate a weekly report");
        }
    }

    #[tokio::test]
    async fn model_error_falls_back_with_reason() {
        match classifier(None).classify("hello").await {
            Classification::Fallback { intent, reason } => {
                assert_eq!(intent.description, "hello");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn well_formed_output_is_understood() {
        let raw = r#"{"task_type": "finance_task", "action": "variance", "parameters": {}, "description": "Budget variance"}"#;
        let outcome = classifier(Some(raw)).classify("show budget variance").await;
        assert!(outcome.is_understood());
        assert_eq!(outcome.intent().task_kind, TaskKind::FinanceTask);
    }
}
