//! REST API route handlers.
//!
//! Every handler under `/api/sessions/{id}` first looks the session up; an
//! unknown or malformed id is a 404.  Errors are returned as
//! `{"error": "..."}` with an appropriate status code.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use taskpilot_agent::{AgentError, AutomationAgent};
use taskpilot_intent::{WorkflowCategory, WorkflowTrigger};
use taskpilot_table::{export_filename, to_csv, to_xlsx};

use crate::state::{AppState, SharedSession};

/// Shown when a chat turn arrives and no key is configured anywhere.
pub const MISSING_KEY_MESSAGE: &str = "Enter an API key first!";

/// Rows included in an upload preview.
pub const PREVIEW_ROWS: usize = 5;

/// Entries returned by the recent-task list.
pub const RECENT_TASKS: usize = 5;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn lookup(state: &AppState, id: &str) -> Result<SharedSession, Response> {
    id.parse::<Uuid>()
        .ok()
        .and_then(|id| state.session(&id))
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("session {id} not found")))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sessions: usize,
    pub provider: &'static str,
    pub credential_configured: bool,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions.len(),
        provider: state.provider.as_str(),
        credential_configured: state.api_key.is_some(),
    })
}

// ---------------------------------------------------------------------------
// Session management
// ---------------------------------------------------------------------------

/// POST /api/sessions: Create a new session.
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.create_session();
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

/// DELETE /api/sessions/{id}: Tear a session down.
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match id.parse::<Uuid>() {
        Ok(uuid) if state.remove_session(&uuid) => StatusCode::NO_CONTENT.into_response(),
        _ => error_response(StatusCode::NOT_FOUND, format!("session {id} not found")),
    }
}

/// Request body for storing a per-session API key.
#[derive(Deserialize)]
pub struct CredentialsBody {
    pub api_key: String,
}

/// PUT /api/sessions/{id}/credentials: Store (or clear) the session's key.
pub async fn set_credentials(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;
    session.set_api_key(&body.api_key);
    Ok(Json(json!({ "configured": session.api_key().is_some() })))
}

/// GET /api/sessions/{id}/messages: The chat transcript.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    Ok(Json(json!(session.messages())))
}

// ---------------------------------------------------------------------------
// POST /api/sessions/{id}/chat
// ---------------------------------------------------------------------------

/// Request body for one chat turn.
#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
}

/// Run one turn: classify, execute, record.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    if body.message.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "message is empty"));
    }

    let mut session = shared.lock().await;
    let Some(key) = state.resolve_api_key(&session) else {
        return Err(error_response(StatusCode::BAD_REQUEST, MISSING_KEY_MESSAGE));
    };
    let model = (state.completion)(&key)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let agent = AutomationAgent::new(model);
    match agent.handle_request(&body.message, &mut session).await {
        Ok(outcome) => {
            let mut reply = json!({
                "task": outcome.intent.task_kind,
                "description": outcome.intent.description,
                "understood": outcome.understood,
                "reply": outcome.output.render(),
            });
            if let Some(table) = outcome.output.table() {
                reply["table"] = json!(table);
            }
            Ok(Json(reply))
        }
        Err(e) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet upload / download
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// POST /api/sessions/{id}/upload?filename=...: Load a CSV/XLSX/XLS file.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;

    match session.load_upload(&query.filename, &body) {
        Ok(loaded) => Ok(Json(json!({
            "filename": loaded.filename,
            "rows": loaded.table.row_count(),
            "columns": loaded.table.columns(),
            "preview": loaded.table.head(PREVIEW_ROWS),
        }))),
        Err(AgentError::Table(e)) => {
            warn!(filename = %query.filename, error = %e, "upload rejected");
            Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}

/// DELETE /api/sessions/{id}/upload: Forget the loaded table.
pub async fn clear_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let cleared = shared.lock().await.clear_upload();
    Ok(Json(json!({ "cleared": cleared })))
}

/// Download format.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /api/sessions/{id}/download?format=csv|xlsx: Export the loaded table.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, Response> {
    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    let Some(loaded) = session.uploaded() else {
        return Err(error_response(StatusCode::NOT_FOUND, "no table loaded"));
    };

    let internal = |e: taskpilot_table::TableError| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    };
    let (mime, extension, body) = match query.format {
        ExportFormat::Csv => (
            "text/csv",
            "csv",
            to_csv(&loaded.table).map_err(internal)?.into_bytes(),
        ),
        ExportFormat::Xlsx => (XLSX_MIME, "xlsx", to_xlsx(&loaded.table).map_err(internal)?),
    };

    let filename = export_filename(Some(&loaded.filename), extension);
    info!(%filename, bytes = body.len(), "table exported");
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Workflows and history
// ---------------------------------------------------------------------------

/// GET /api/sessions/{id}/workflows: Saved workflow definitions.
pub async fn list_workflows(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    Ok(Json(json!(session.workflows())))
}

/// Request body for creating a workflow.
#[derive(Deserialize)]
pub struct WorkflowBody {
    pub name: String,
    #[serde(default)]
    pub trigger: WorkflowTrigger,
    pub category: WorkflowCategory,
    pub steps: Vec<String>,
}

/// POST /api/sessions/{id}/workflows: Save a workflow definition.
pub async fn create_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<WorkflowBody>,
) -> Result<(StatusCode, Json<Value>), Response> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;
    session
        .add_workflow(&body.name, body.trigger, body.category, &body.steps)
        .map(|wf| (StatusCode::CREATED, Json(json!(wf))))
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))
}

/// GET /api/sessions/{id}/history: The most recent completed tasks.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    let entries: Vec<Value> = session
        .recent_tasks(RECENT_TASKS)
        .iter()
        .map(|e| json!({ "name": e.name, "time": e.time_label() }))
        .collect();
    Ok(Json(json!(entries)))
}
