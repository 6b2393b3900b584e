//! Model-service gateway for instruction decomposition.
//!
//! This module provides a trait-based abstraction over chat-completion
//! providers, with an OpenAI-compatible endpoint as the primary
//! implementation, plus a retrying invoker driven by caller-supplied
//! response validation.
//!
//! A gateway call is a single best-effort request: transport failures
//! surface immediately as [`LlmError`] and are never retried. Retry lives
//! one layer up, in [`RetryingInvoker`], and only re-asks the model when
//! the returned *content* fails validation.

mod error;
mod openai;
mod retry;

pub use error::{classify_http_status, LlmError, LlmErrorKind};
pub use openai::OpenAiClient;
pub use retry::RetryingInvoker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role in a chat conversation.
///
/// The decomposition wire contract only ever sends a system prompt
/// followed by a user prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Optional sampling parameters for chat completions.
///
/// These are intentionally conservative; decomposition pins temperature
/// to 0 so repeated runs over the same instruction stay reproducible.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Sampling temperature (0 = deterministic).
    pub temperature: Option<f64>,
    /// Maximum output tokens to generate.
    pub max_tokens: Option<u64>,
}

impl ChatOptions {
    /// Options for deterministic decomposition calls.
    pub fn deterministic() -> Self {
        ChatOptions {
            temperature: Some(0.0),
            max_tokens: None,
        }
    }
}

/// Trait for model-service gateways.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send one chat-completion request and return the raw response text.
    ///
    /// # Errors
    /// Returns [`LlmError`] when the underlying service call fails
    /// (network, auth, quota) or its payload cannot be decoded. No retry
    /// logic lives here.
    async fn converse(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, LlmError>;

    /// Identifier of the model this gateway talks to, recorded in
    /// sequence metadata.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::system("be terse");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be terse");
    }

    #[test]
    fn test_deterministic_options_pin_temperature() {
        let options = ChatOptions::deterministic();
        assert_eq!(options.temperature, Some(0.0));
    }
}
