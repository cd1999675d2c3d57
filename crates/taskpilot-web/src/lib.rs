//! Web interface for TaskPilot.
//!
//! This crate provides an HTTP server that exposes the assistant through a
//! browser UI.  It includes:
//!
//! - A REST API for sessions, chat turns, spreadsheet upload and download,
//!   workflow definitions and the recent-task list.
//! - An embedded single-page HTML frontend served at `/`.
//!
//! Every browser session gets its own [`taskpilot_agent::SessionState`],
//! kept in memory until the session is deleted or the server stops.

pub mod api;
pub mod frontend;
pub mod server;
pub mod state;

pub use server::WebServer;
pub use state::{AppState, CompletionFactory};

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 8501,
        }
    }
}
