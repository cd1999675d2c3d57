//! Multi-provider LLM client.
//!
//! Supports the **Gemini generateContent API**, the **Anthropic Messages
//! API**, and the **OpenAI Chat Completions API** (including OpenAI-compatible
//! endpoints such as Ollama or vLLM) in non-streaming mode.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{LlmError, Result};
use crate::types::{ChatRequest, Message, Role};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Anthropic API base URL.
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Transport timeout for a single completion round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Provider enum
// ---------------------------------------------------------------------------

/// Identifies which LLM provider the client should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Google Gemini generateContent API.
    Gemini,
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI Chat Completions API (also covers OpenAI-compatible endpoints).
    OpenAI,
}

impl LlmProvider {
    /// Lowercase provider name as used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
        }
    }

    /// The environment variable conventionally holding this provider's key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Default model for the provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_BASE_URL,
            Self::Anthropic => ANTHROPIC_BASE_URL,
            Self::OpenAI => OPENAI_BASE_URL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            other => Err(LlmError::UnknownProvider {
                name: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to a single LLM provider endpoint.
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    /// Which provider this configuration targets.
    pub provider: LlmProvider,
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Default model identifier.
    pub default_model: String,
    /// Default maximum tokens per response.
    pub max_tokens: u32,
}

impl LlmClientConfig {
    /// Configuration for a provider with its default endpoint and model.
    pub fn for_provider(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: provider.default_base_url().to_owned(),
            default_model: provider.default_model().to_owned(),
            max_tokens: 4096,
        }
    }

    /// Create a configuration for the Gemini API.
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            default_model: model.into(),
            ..Self::for_provider(LlmProvider::Gemini, api_key)
        }
    }

    /// Create a configuration for the Anthropic API.
    pub fn anthropic(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            default_model: model.into(),
            ..Self::for_provider(LlmProvider::Anthropic, api_key)
        }
    }

    /// Create a configuration for the OpenAI API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            default_model: model.into(),
            ..Self::for_provider(LlmProvider::OpenAI, api_key)
        }
    }

    /// Create a configuration for any OpenAI-compatible API.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::openai(api_key, model)
        }
    }

    /// Same endpoint and model, different key.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An HTTP client for one LLM provider endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: Arc<LlmClientConfig>,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the key is empty.
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                provider: config.provider.as_str().into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Returns the configured provider.
    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Send a chat request and return the response text.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let (url, headers, body) = match self.config.provider {
            LlmProvider::Gemini => {
                let body = self.build_gemini_request_body(request);
                let url = format!(
                    "{}/v1beta/models/{}:generateContent",
                    self.config.base_url,
                    self.model_for(request)
                );
                (url, self.gemini_headers()?, body)
            }
            LlmProvider::Anthropic => {
                let url = format!("{}/v1/messages", self.config.base_url);
                (url, self.anthropic_headers()?, self.build_anthropic_request_body(request))
            }
            LlmProvider::OpenAI => {
                let url = format!("{}/chat/completions", self.config.base_url);
                (url, self.openai_headers()?, self.build_openai_request_body(request))
            }
        };

        tracing::debug!(
            url = %url,
            model = %self.model_for(request),
            provider = %self.config.provider,
            "sending LLM request"
        );

        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| LlmError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| LlmError::ParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        match self.config.provider {
            LlmProvider::Gemini => parse_gemini_response(&v),
            LlmProvider::Anthropic => parse_anthropic_response(&v),
            LlmProvider::OpenAI => parse_openai_response(&v),
        }
    }

    fn model_for<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        if request.model.is_empty() {
            &self.config.default_model
        } else {
            &request.model
        }
    }

    // -- Headers -------------------------------------------------------------

    fn gemini_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid API key header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn anthropic_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid API key header: {e}"),
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn openai_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    // -- Request bodies ------------------------------------------------------

    /// Build the JSON body for the Gemini generateContent API.
    fn build_gemini_request_body(&self, request: &ChatRequest) -> Value {
        let (system_text, contents) = messages_to_gemini(&request.messages);

        let mut generation_config = json!({
            "maxOutputTokens": request.max_tokens.unwrap_or(self.config.max_tokens),
        });
        if let Some(temp) = request.temperature {
            generation_config["temperature"] = json!(temp);
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(system) = system_text {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        body
    }

    /// Build the JSON body for the Anthropic Messages API.
    fn build_anthropic_request_body(&self, request: &ChatRequest) -> Value {
        let (system_text, messages) = split_system(&request.messages);

        let mut body = json!({
            "model": self.model_for(request),
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages,
        });

        if let Some(system) = system_text {
            body["system"] = json!(system);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    /// Build the JSON body for the OpenAI Chat Completions API.
    fn build_openai_request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": role_name(m.role), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.model_for(request),
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }
}

// ===========================================================================
// Wire format conversion (free functions)
// ===========================================================================

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Pull system messages out into a single instruction string and convert
/// the rest to `{role, content}` pairs (Anthropic format).
fn split_system(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system: Option<String> = None;
    let mut wire_messages = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role {
            Role::System => match &mut system {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(&msg.content);
                }
                None => system = Some(msg.content.clone()),
            },
            role => wire_messages.push(json!({
                "role": role_name(role),
                "content": msg.content,
            })),
        }
    }

    (system, wire_messages)
}

/// Convert messages to Gemini `contents`.  Gemini calls the assistant role
/// `model` and carries system text separately.
fn messages_to_gemini(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let (system, wire) = split_system(messages);
    let contents = wire
        .into_iter()
        .map(|m| {
            let role = if m["role"] == "assistant" { "model" } else { "user" };
            json!({ "role": role, "parts": [{ "text": m["content"] }] })
        })
        .collect();
    (system, contents)
}

/// Extract the text from a Gemini generateContent response.
fn parse_gemini_response(v: &Value) -> Result<String> {
    let parts = v["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| LlmError::ParseFailed {
            reason: "missing `candidates[0].content.parts` in response".into(),
        })?;

    join_text(parts.iter().filter_map(|p| p["text"].as_str()), "content part")
}

/// Extract the text from an Anthropic Messages response.
fn parse_anthropic_response(v: &Value) -> Result<String> {
    let content = v["content"]
        .as_array()
        .ok_or_else(|| LlmError::ParseFailed {
            reason: "missing `content` array in response".into(),
        })?;

    join_text(
        content
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str()),
        "content block",
    )
}

/// Extract the text from an OpenAI Chat Completions response.
fn parse_openai_response(v: &Value) -> Result<String> {
    let message = &v["choices"][0]["message"];
    if message.is_null() {
        return Err(LlmError::ParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }
    message["content"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| LlmError::ParseFailed {
            reason: "`choices[0].message.content` is not text".into(),
        })
}

/// Concatenate text fragments; a response with none is a parse failure.
fn join_text<'a>(fragments: impl Iterator<Item = &'a str>, what: &str) -> Result<String> {
    let fragments: Vec<&str> = fragments.collect();
    if fragments.is_empty() {
        return Err(LlmError::ParseFailed {
            reason: format!("no {what} carries text"),
        });
    }
    Ok(fragments.concat())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            model: String::new(),
            messages: vec![Message::system("Be terse."), Message::user("Hello")],
            temperature: Some(0.5),
            max_tokens: Some(512),
        }
    }

    #[test]
    fn empty_api_key_returns_error() {
        let result = LlmClient::new(LlmClientConfig::gemini("", "gemini-1.5-flash"));
        assert!(matches!(result, Err(LlmError::MissingApiKey { .. })));

        let result = LlmClient::new(LlmClientConfig::openai("   ", "gpt-4o-mini"));
        assert!(result.is_err());
    }

    #[test]
    fn provider_parsing() {
        assert_eq!("gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!("Claude".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
        assert_eq!(" openai ".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert!("palm".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn default_config_uses_provider_defaults() {
        let config = LlmClientConfig::for_provider(LlmProvider::Gemini, "k");
        assert_eq!(config.default_model, "gemini-1.5-flash");
        assert_eq!(config.base_url, GEMINI_BASE_URL);

        let rekeyed = config.with_api_key("other");
        assert_eq!(rekeyed.api_key, "other");
        assert_eq!(rekeyed.default_model, config.default_model);
    }

    #[test]
    fn build_gemini_request_body_basic() {
        let client = LlmClient::new(LlmClientConfig::gemini("k", "gemini-1.5-flash")).unwrap();
        let body = client.build_gemini_request_body(&request());

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be terse.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gemini_assistant_role_is_model() {
        let (_, contents) =
            messages_to_gemini(&[Message::user("hi"), Message::assistant("hello")]);
        assert_eq!(contents[1]["role"], "model");
    }

    #[test]
    fn build_anthropic_request_body_basic() {
        let client =
            LlmClient::new(LlmClientConfig::anthropic("k", "claude-3-5-haiku-latest")).unwrap();
        let body = client.build_anthropic_request_body(&request());

        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["system"], "Be terse.");
        assert_eq!(body["max_tokens"], 512);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[test]
    fn build_openai_request_body_keeps_system_inline() {
        let client = LlmClient::new(LlmClientConfig::openai("k", "gpt-4o-mini")).unwrap();
        let mut req = request();
        req.model = "gpt-4o".into();
        let body = client.build_openai_request_body(&req);

        assert_eq!(body["model"], "gpt-4o");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "Hello");
    }

    #[test]
    fn openai_compatible_overrides_base_url() {
        let config = LlmClientConfig::openai_compatible("k", "llama3", "http://localhost:11434/v1");
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.default_model, "llama3");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn parse_gemini_text_response() {
        let v = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello, " }, { "text": "world" }] }
            }]
        });
        assert_eq!(parse_gemini_response(&v).unwrap(), "Hello, world");
        assert!(parse_gemini_response(&json!({ "candidates": [] })).is_err());

        let no_text = json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "inlineData": {} }] } }]
        });
        assert!(matches!(
            parse_gemini_response(&no_text),
            Err(LlmError::ParseFailed { .. })
        ));
    }

    #[test]
    fn parse_anthropic_text_response() {
        let v = json!({
            "content": [{ "type": "text", "text": "Hi there" }],
            "stop_reason": "end_turn"
        });
        assert_eq!(parse_anthropic_response(&v).unwrap(), "Hi there");
        assert!(parse_anthropic_response(&json!({})).is_err());

        let tool_only = json!({ "content": [{ "type": "tool_use", "id": "t1" }] });
        assert!(matches!(
            parse_anthropic_response(&tool_only),
            Err(LlmError::ParseFailed { .. })
        ));
    }

    #[test]
    fn parse_openai_text_response() {
        let v = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Done." } }]
        });
        assert_eq!(parse_openai_response(&v).unwrap(), "Done.");
        assert!(parse_openai_response(&json!({ "choices": [] })).is_err());

        let null_content = json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        });
        assert!(matches!(
            parse_openai_response(&null_content),
            Err(LlmError::ParseFailed { .. })
        ));
    }
}
