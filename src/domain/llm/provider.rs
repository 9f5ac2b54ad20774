use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers (OpenAI-compatible, Anthropic)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::sync::Mutex;

    /// Mock provider replying with a fixed text and recording requests
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        reply: Option<String>,
        error: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                reply: None,
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
            self.reply = Some(reply.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            self.reply
                .as_ref()
                .map(|reply| LlmResponse::new("mock-id", model, Message::assistant(reply.clone())))
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
