//! Integration tests for the taskpilot-web crate.
//!
//! These cover configuration and router construction without a network
//! listener; `e2e.rs` drives a real server.

use taskpilot_llm::LlmClientConfig;
use taskpilot_web::{AppState, WebConfig, WebServer};

#[test]
fn web_config_defaults() {
    let config = WebConfig::default();
    assert_eq!(config.bind_addr, "127.0.0.1");
    assert_eq!(config.port, 8501);
}

#[test]
fn server_addr_uses_config() {
    let config = WebConfig {
        bind_addr: "0.0.0.0".into(),
        port: 8080,
    };
    let state = AppState::with_llm(config, LlmClientConfig::gemini("", "gemini-1.5-flash"));
    let server = WebServer::new(state);
    assert_eq!(server.addr(), "0.0.0.0:8080");
    let _router = server.router();
}
