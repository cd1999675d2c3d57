//! Configuration loading.
//!
//! Reads `config/default.toml` (or the path given with `--config`) and
//! layers environment variables on top.  A missing file, a file that does
//! not parse, or a missing section all fall back to defaults.
//!
//! ```toml
//! [llm]
//! provider = "gemini"
//! model = "gemini-1.5-flash"
//! base_url = "https://generativelanguage.googleapis.com"
//!
//! [web]
//! bind = "127.0.0.1"
//! port = 8501
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use taskpilot_llm::{LlmClientConfig, LlmProvider};
use taskpilot_web::WebConfig;

/// Settings from the `[llm]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: None,
            base_url: None,
        }
    }
}

/// Everything read from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub web: WebConfig,
}

/// Load the configuration file at `path`.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            return AppConfig::default();
        }
    };
    parse_config(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
        AppConfig::default()
    })
}

/// Parse configuration text.  Unknown keys are ignored.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let table: toml::Table = content.parse().context("failed to parse TOML")?;
    let mut config = AppConfig::default();

    if let Some(toml::Value::Table(llm)) = table.get("llm") {
        if let Some(name) = llm.get("provider").and_then(|v| v.as_str()) {
            config.llm.provider = name.parse().context("invalid [llm] provider")?;
        }
        config.llm.model = llm
            .get("model")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
        config.llm.base_url = llm
            .get("base_url")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
    }

    if let Some(toml::Value::Table(web)) = table.get("web") {
        if let Some(bind) = web.get("bind").and_then(|v| v.as_str()) {
            config.web.bind_addr = bind.to_owned();
        }
        if let Some(port) = web.get("port").and_then(|v| v.as_integer()) {
            config.web.port = u16::try_from(port).context("[web] port out of range")?;
        }
    }

    Ok(config)
}

/// Read a non-empty environment variable.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Build the LLM client configuration from file settings and the process
/// environment.  The API key may come back empty; callers decide whether
/// that is fatal.
pub fn resolve_llm_config(settings: &LlmSettings) -> Result<LlmClientConfig> {
    resolve_llm_config_with(settings, env_non_empty)
}

/// [`resolve_llm_config`] with an explicit variable lookup.
///
/// Precedence: `TASKPILOT_PROVIDER` over the file's provider;
/// `TASKPILOT_MODEL` over the file's model over the provider default;
/// `TASKPILOT_API_KEY` over the provider's own key variable.
pub fn resolve_llm_config_with<F>(settings: &LlmSettings, lookup: F) -> Result<LlmClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match lookup("TASKPILOT_PROVIDER") {
        Some(name) => name.parse().context("invalid TASKPILOT_PROVIDER")?,
        None => settings.provider,
    };

    let api_key = lookup("TASKPILOT_API_KEY")
        .or_else(|| lookup(provider.api_key_env()))
        .unwrap_or_default();

    let mut config = LlmClientConfig::for_provider(provider, api_key);
    if let Some(model) = lookup("TASKPILOT_MODEL").or_else(|| settings.model.clone()) {
        config.default_model = model;
    }
    if let Some(url) = &settings.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}
