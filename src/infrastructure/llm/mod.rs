//! LLM provider implementations

mod anthropic;
mod factory;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::{LlmProviderConfig, LlmProviderFactory, LlmProviderType};
pub use openai::OpenAiProvider;
