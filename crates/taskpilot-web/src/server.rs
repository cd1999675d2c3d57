//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and starts
//! the HTTP listener.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::response::Html;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::frontend::INDEX_HTML;
use crate::state::AppState;

/// Largest accepted request body (uploads included).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// The TaskPilot web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.state.config.bind_addr, self.state.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let router = self.router();

        tracing::info!(
            addr = %addr,
            provider = %self.state.provider,
            "starting web server"
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// The full application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        // Embedded frontend.
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/api/status", get(api::status))
        // Session management.
        .route("/api/sessions", post(api::create_session))
        .route("/api/sessions/{id}", axum::routing::delete(api::delete_session))
        .route("/api/sessions/{id}/credentials", put(api::set_credentials))
        .route("/api/sessions/{id}/messages", get(api::get_messages))
        // Turns.
        .route("/api/sessions/{id}/chat", post(api::chat))
        // Spreadsheets.
        .route(
            "/api/sessions/{id}/upload",
            post(api::upload).delete(api::clear_upload),
        )
        .route("/api/sessions/{id}/download", get(api::download))
        // Workflows and history.
        .route(
            "/api/sessions/{id}/workflows",
            get(api::list_workflows).post(api::create_workflow),
        )
        .route("/api/sessions/{id}/history", get(api::history))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}
