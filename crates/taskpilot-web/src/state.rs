//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It owns the session registry and knows how to build a
//! completion model for a given API key.
//!
//! Sessions live in a `DashMap` keyed by id; each one sits behind its own
//! `tokio::sync::Mutex` so turns within a session run one at a time while
//! different sessions proceed independently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use taskpilot_agent::SessionState;
use taskpilot_llm::{LlmClient, LlmClientConfig, LlmProvider, TextCompletion};

use crate::WebConfig;

/// Builds a completion model for an API key.
pub type CompletionFactory =
    Arc<dyn Fn(&str) -> taskpilot_llm::Result<Arc<dyn TextCompletion>> + Send + Sync>;

/// A session handle as stored in the registry.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Web server configuration.
    pub config: WebConfig,

    /// The provider completions go to.  Reported by `/api/status`.
    pub provider: LlmProvider,

    /// Server-wide API key from the environment, if any.  A session's own
    /// key takes precedence.
    pub api_key: Option<String>,

    /// Turns an API key into a completion model.
    pub completion: CompletionFactory,

    /// Live sessions by id.
    pub sessions: Arc<DashMap<Uuid, SharedSession>>,
}

impl AppState {
    pub fn new(
        config: WebConfig,
        provider: LlmProvider,
        api_key: Option<String>,
        completion: CompletionFactory,
    ) -> Self {
        Self {
            config,
            provider,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            completion,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// State whose completions go to a real provider described by `llm`.
    ///
    /// The key in `llm` (possibly empty) is the server-wide key; each turn
    /// builds a client with whichever key applies.
    pub fn with_llm(config: WebConfig, llm: LlmClientConfig) -> Self {
        let provider = llm.provider;
        let api_key = Some(llm.api_key.clone());
        let completion: CompletionFactory = Arc::new(move |key: &str| {
            let client = LlmClient::new(llm.with_api_key(key))?;
            Ok(Arc::new(client) as Arc<dyn TextCompletion>)
        });
        Self::new(config, provider, api_key, completion)
    }

    pub fn create_session(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions
            .insert(id, Arc::new(Mutex::new(SessionState::new())));
        info!(session = %id, "session created");
        id
    }

    pub fn session(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Tear a session down.  Returns whether it existed.
    pub fn remove_session(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, "session deleted");
        }
        removed
    }

    /// The key a turn in `session` should use, if any.
    pub fn resolve_api_key(&self, session: &SessionState) -> Option<String> {
        session
            .api_key()
            .map(str::to_owned)
            .or_else(|| self.api_key.clone())
    }
}
