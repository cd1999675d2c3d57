//! The text-completion capability.
//!
//! The assistant treats the model as an opaque `prompt -> text` function.
//! Any non-error return is a successful text blob; no structure is assumed.

use async_trait::async_trait;

use crate::client::LlmClient;
use crate::error::Result;
use crate::types::ChatRequest;

/// A single-method completion boundary.
///
/// Implemented by [`LlmClient`] for real providers; tests implement it with
/// canned responses.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Complete `prompt` and return the model's raw text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl TextCompletion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&ChatRequest::prompt(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::LlmClientConfig;

    struct Echo;

    #[async_trait]
    impl TextCompletion for Echo {
        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn trait_object_dispatch() {
        let model: Arc<dyn TextCompletion> = Arc::new(Echo);
        assert_eq!(model.complete("hi").await.unwrap(), "echo: hi");
    }

    #[test]
    fn llm_client_is_a_text_completion() {
        let client = LlmClient::new(LlmClientConfig::gemini("k", "gemini-1.5-flash")).unwrap();
        let _model: Arc<dyn TextCompletion> = Arc::new(client);
    }
}
